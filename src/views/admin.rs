use crate::{
    constants::Role,
    models::{AllowedUser, User},
    usecases::{cpf, session::Session},
    utils::{fmt_brl, fmt_date},
    views::{escape, layout, message},
};

pub struct AdminPage<'a> {
    pub allowed: &'a [AllowedUser],
    pub users: &'a [User],
    pub monthly_fee_cents: i64,
    pub notice: Option<&'a str>,
    pub error: Option<&'a str>,
}

fn allowed_row(entry: &AllowedUser) -> String {
    let (badge, action) = if entry.is_used {
        (r#"<span class="badge ok">Utilizado</span>"#, String::new())
    } else {
        (
            r#"<span class="badge warn">Pendente</span>"#,
            format!(
                r#"<form class="inline" method="post" action="/admin/allowed-users/{}/delete"><button type="submit">Remover</button></form>"#,
                entry.cpf
            ),
        )
    };

    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{badge}</td><td>{action}</td></tr>",
        cpf::format(&entry.cpf),
        escape(&entry.name),
        fmt_date(entry.created_at.date_naive()),
    )
}

fn user_row(user: &User, own_id: u64) -> String {
    let toggle = if user.id == own_id {
        String::new()
    } else {
        let (value, label) = if user.is_active {
            ("false", "Desativar")
        } else {
            ("true", "Ativar")
        };

        format!(
            r#"<form class="inline" method="post" action="/admin/users/{}/status"><input type="hidden" name="is_active" value="{value}"><button type="submit">{label}</button></form>"#,
            user.id
        )
    };

    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{toggle}</td></tr>",
        escape(&user.name),
        escape(&user.email),
        user.cpf.as_deref().map(cpf::format).unwrap_or_default(),
        user.role().label(),
        if user.is_active { "Ativo" } else { "Inativo" },
    )
}

pub fn render(session: &Session, page: &AdminPage<'_>) -> String {
    let allowed = page.allowed.iter().map(allowed_row).collect::<String>();
    let users = page
        .users
        .iter()
        .map(|u| user_row(u, session.sub))
        .collect::<String>();

    let roles = [Role::Player, Role::Committee]
        .iter()
        .map(|r| format!(r#"<option value="{}">{}</option>"#, r.as_str(), r.label()))
        .collect::<String>();

    let fee = fmt_brl(page.monthly_fee_cents);

    let body = format!(
        r#"<h1>Administração</h1>
{notice}{error}
<section class="card">
<h2>CPFs autorizados</h2>
<form method="post" action="/admin/allowed-users">
<label for="cpf">CPF</label><input id="cpf" name="cpf" placeholder="000.000.000-00" required>
<label for="name">Nome</label><input id="name" name="name" required>
<button type="submit">Autorizar</button>
</form>
<table><tr><th>CPF</th><th>Nome</th><th>Autorizado em</th><th>Situação</th><th></th></tr>{allowed}</table>
</section>
<section class="card">
<h2>Usuários</h2>
<table><tr><th>Nome</th><th>Email</th><th>CPF</th><th>Papel</th><th>Situação</th><th></th></tr>{users}</table>
<h3>Novo usuário</h3>
<form method="post" action="/admin/users">
<label>Nome</label><input name="name" required>
<label>Email</label><input name="email" type="email" required>
<label>CPF (opcional)</label><input name="cpf">
<label>Senha</label><input name="password" type="password" minlength="6" required>
<label>Papel</label><select name="role">{roles}</select>
<button type="submit">Criar</button>
</form>
</section>
<section class="card">
<h2>Mensalidade padrão</h2>
<p>Valor atual: <strong>{fee}</strong></p>
<form method="post" action="/admin/monthly-fee">
<label>Novo valor</label><input name="amount" placeholder="0,00" required>
<button type="submit">Salvar</button>
</form>
</section>"#,
        notice = message("notice", page.notice),
        error = message("error", page.error),
    );

    layout("Administração", Some(session), &body)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn only_unused_entries_can_be_removed() {
        let entry = |cpf: &str, is_used| AllowedUser {
            id: 1,
            cpf: cpf.into(),
            name: "Fulano".into(),
            is_used,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let used = allowed_row(&entry("52998224725", true));
        let pending = allowed_row(&entry("11144477735", false));

        assert!(used.contains("529.982.247-25"));
        assert!(!used.contains("delete"));
        assert!(pending.contains("/admin/allowed-users/11144477735/delete"));
    }
}
