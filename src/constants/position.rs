#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Goalkeeper,
    CentreBack,
    FullBack,
    DefensiveMidfielder,
    Midfielder,
    Forward,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::Goalkeeper,
        Position::CentreBack,
        Position::FullBack,
        Position::DefensiveMidfielder,
        Position::Midfielder,
        Position::Forward,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goleiro",
            Position::CentreBack => "Zagueiro",
            Position::FullBack => "Lateral",
            Position::DefensiveMidfielder => "Volante",
            Position::Midfielder => "Meia",
            Position::Forward => "Atacante",
        }
    }

    pub fn parse(position: &str) -> Option<Self> {
        let position = position.trim();

        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(position))
    }
}

pub const MIN_SHIRT_NUMBER: u8 = 1;
pub const MAX_SHIRT_NUMBER: u8 = 99;
