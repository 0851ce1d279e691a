use crate::{
    constants::{MAX_SHIRT_NUMBER, MIN_SHIRT_NUMBER, Position},
    dto::player::NewPlayerForm,
    models::PlayerListing,
    usecases::session::Session,
    views::{escape, layout, message},
};

pub fn list(session: &Session, players: &[PlayerListing], query: Option<&str>) -> String {
    let rows = if players.is_empty() {
        r#"<tr><td colspan="6">Nenhum jogador encontrado.</td></tr>"#.to_string()
    } else {
        players
            .iter()
            .map(|p| {
                let status = if p.is_active {
                    r#"<span class="badge ok">Ativo</span>"#
                } else {
                    r#"<span class="badge">Inativo</span>"#
                };
                let pending = if p.pending_monthlies > 0 {
                    format!(
                        r#"<span class="badge warn">{} pendente(s)</span>"#,
                        p.pending_monthlies
                    )
                } else {
                    "Em dia".to_string()
                };

                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{status} {pending}</td></tr>",
                    p.shirt_number,
                    escape(&p.full_name),
                    escape(&p.nickname),
                    escape(&p.position),
                    escape(&p.phone),
                )
            })
            .collect()
    };

    let new_link = if session.is_committee() {
        r#"<p><a href="/players/new">Cadastrar jogador</a></p>"#
    } else {
        ""
    };

    let body = format!(
        r#"<h1>Jogadores</h1>
{new_link}
<form method="get" action="/players">
<input name="q" value="{query}" placeholder="Buscar por nome ou apelido">
</form>
<section class="card">
<table>
<tr><th>Nº</th><th>Nome</th><th>Apelido</th><th>Posição</th><th>Telefone</th><th>Situação</th></tr>
{rows}
</table>
</section>"#,
        query = escape(query.unwrap_or_default()),
    );

    layout("Jogadores", Some(session), &body)
}

pub fn new_form(session: &Session, values: &NewPlayerForm, error: Option<&str>) -> String {
    let positions = Position::ALL
        .iter()
        .map(|p| {
            let selected = if p.as_str().eq_ignore_ascii_case(values.position.trim()) {
                " selected"
            } else {
                ""
            };
            format!(r#"<option value="{0}"{selected}>{0}</option>"#, p.as_str())
        })
        .collect::<String>();

    let body = format!(
        r#"<section class="card">
<h1>Novo jogador</h1>
{error}
<form method="post" action="/players">
<label for="full_name">Nome completo</label>
<input id="full_name" name="full_name" value="{full_name}" required>
<label for="nickname">Apelido</label>
<input id="nickname" name="nickname" value="{nickname}" required>
<label for="position">Posição</label>
<select id="position" name="position">{positions}</select>
<label for="shirt_number">Número da camisa</label>
<input id="shirt_number" name="shirt_number" type="number" min="{MIN_SHIRT_NUMBER}" max="{MAX_SHIRT_NUMBER}" value="{shirt_number}" required>
<label for="birth_date">Data de nascimento</label>
<input id="birth_date" name="birth_date" type="date" value="{birth_date}" required>
<label for="phone">Telefone</label>
<input id="phone" name="phone" value="{phone}" required>
<label for="address">Endereço</label>
<input id="address" name="address" value="{address}" required>
<label for="email">Email</label>
<input id="email" name="email" type="email" value="{email}" required>
<label for="cpf">CPF</label>
<input id="cpf" name="cpf" value="{cpf}" required>
<label for="password">Senha inicial</label>
<input id="password" name="password" type="password" minlength="6" required>
<button type="submit">Cadastrar</button>
</form>
</section>"#,
        error = message("error", error),
        full_name = escape(&values.full_name),
        nickname = escape(&values.nickname),
        shirt_number = escape(&values.shirt_number),
        birth_date = escape(&values.birth_date),
        phone = escape(&values.phone),
        address = escape(&values.address),
        email = escape(&values.email),
        cpf = escape(&values.cpf),
    );

    layout("Novo jogador", Some(session), &body)
}
