#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthlyStatus {
    Paid,
    Open,
    Overdue,
}

impl MonthlyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonthlyStatus::Paid => "pago",
            MonthlyStatus::Open => "em_aberto",
            MonthlyStatus::Overdue => "vencido",
        }
    }

    pub fn from_db(status: &str) -> Self {
        match status {
            "pago" => MonthlyStatus::Paid,
            "vencido" => MonthlyStatus::Overdue,
            _ => MonthlyStatus::Open,
        }
    }

    pub fn parse(status: &str) -> Option<Self> {
        match status.trim() {
            "pago" => Some(MonthlyStatus::Paid),
            "em_aberto" => Some(MonthlyStatus::Open),
            "vencido" => Some(MonthlyStatus::Overdue),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MonthlyStatus::Paid => "Pago",
            MonthlyStatus::Open => "Em aberto",
            MonthlyStatus::Overdue => "Vencido",
        }
    }

    pub fn is_pending(&self) -> bool {
        !matches!(self, MonthlyStatus::Paid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardStatus {
    Pending,
    Paid,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Pending => "pendente",
            CardStatus::Paid => "pago",
        }
    }

    pub fn from_db(status: &str) -> Self {
        match status {
            "pago" => CardStatus::Paid,
            _ => CardStatus::Pending,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CardStatus::Pending => "Pendente",
            CardStatus::Paid => "Pago",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Inflow,
    Outflow,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Inflow => "entrada",
            TransactionKind::Outflow => "saida",
        }
    }

    pub fn from_db(kind: &str) -> Self {
        match kind {
            "saida" => TransactionKind::Outflow,
            _ => TransactionKind::Inflow,
        }
    }

    pub fn parse(kind: &str) -> Option<Self> {
        match kind.trim() {
            "entrada" => Some(TransactionKind::Inflow),
            "saida" => Some(TransactionKind::Outflow),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Inflow => "Entrada",
            TransactionKind::Outflow => "Saída",
        }
    }
}
