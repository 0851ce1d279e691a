use chrono::Datelike;

use crate::{
    models::AssociationProfile,
    usecases::session::Session,
    utils::fmt_n,
    views::{escape, layout},
};

pub fn render(profile: &AssociationProfile, session: Option<&Session>) -> String {
    let a = &profile.association;

    let commission = a
        .commission
        .iter()
        .map(|name| format!("<li>{}</li>", escape(name)))
        .collect::<String>();

    let social = [
        ("Facebook", &a.facebook),
        ("Twitter", &a.twitter),
        ("Instagram", &a.instagram),
    ]
    .into_iter()
    .filter_map(|(label, url)| {
        url.as_deref()
            .map(|url| format!(r#"<a href="{}" rel="noopener">{label}</a>"#, escape(url)))
    })
    .collect::<Vec<_>>()
    .join(" · ");

    let call_to_action = if session.is_some() {
        r#"<a href="/dashboard">Ir para o painel</a>"#
    } else {
        r#"<a href="/login">Entrar</a> ou <a href="/register">cadastre-se</a> se o seu CPF foi autorizado pela comissão."#
    };

    let body = format!(
        r#"<section class="card">
<h1>{name}</h1>
<p>{description}</p>
<p>{call_to_action}</p>
</section>
<section class="grid">
<div class="card stat"><span>Fundação</span><strong>{founded}</strong></div>
<div class="card stat"><span>Jogadores ativos</span><strong>{players}</strong></div>
<div class="card stat"><span>Jogos</span><strong>{schedule}</strong></div>
</section>
<section class="card">
<h2>Comissão</h2>
<ul>{commission}</ul>
</section>
<section class="card">
<h2>Contato</h2>
<p>{address}</p>
<p>{phone} · <a href="mailto:{email}">{email}</a></p>
<p>{social}</p>
</section>"#,
        name = escape(&a.name),
        description = escape(&a.description),
        founded = a.founded_date.year(),
        players = fmt_n(profile.total_players),
        schedule = escape(&a.game_schedule),
        address = escape(&a.address),
        phone = escape(&a.phone),
        email = escape(&a.email),
    );

    layout(&a.name, session, &body)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use sqlx::types::Json;

    use super::*;
    use crate::models::Association;

    #[test]
    fn shows_association_details() {
        let profile = AssociationProfile {
            association: Association {
                id: 1,
                name: "Associação de Porto dos Santos".into(),
                description: "Futebol & comunidade".into(),
                founded_date: NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
                address: "Rua Alto do Verão".into(),
                phone: "(71) 99999-9999".into(),
                email: "contato@portodossantos.com.br".into(),
                logo: None,
                facebook: Some("https://facebook.com/portodossantos".into()),
                twitter: None,
                instagram: None,
                commission: Json(vec!["Mauricio Porto".into(), "Stivie".into()]),
                game_schedule: "Domingos pela manhã".into(),
                monthly_fee_cents: 5_000,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            slug: "porto-dos-santos".into(),
            total_players: 1_204,
        };

        let page = render(&profile, None);

        assert!(page.contains("Futebol &amp; comunidade"));
        assert!(page.contains("2020"));
        assert!(page.contains("1.204"));
        assert!(page.contains("<li>Stivie</li>"));
        assert!(page.contains("https://facebook.com/portodossantos"));
        assert!(!page.contains("Twitter"));
    }
}
