use crate::{
    usecases::cpf,
    views::{escape, layout, message},
};

pub struct LoginPage<'a> {
    pub callback_url: &'a str,
    pub login: Option<&'a str>,
    pub error: Option<&'a str>,
    pub notice: Option<&'a str>,
}

pub fn login(page: &LoginPage<'_>) -> String {
    let login_value = page.login.map(cpf::format).unwrap_or_default();

    let body = format!(
        r#"<section class="card">
<h1>Entrar</h1>
{notice}{error}
<form method="post" action="/login">
<input type="hidden" name="callbackUrl" value="{callback}">
<label for="login">CPF ou email</label>
<input id="login" name="login" value="{login}" required autofocus>
<label for="password">Senha</label>
<input id="password" name="password" type="password" required>
<button type="submit">Entrar</button>
</form>
<p>Ainda não tem conta? <a href="/register">Cadastre-se</a></p>
</section>"#,
        notice = message("notice", page.notice),
        error = message("error", page.error),
        callback = escape(page.callback_url),
        login = escape(&login_value),
    );

    layout("Entrar", None, &body)
}

#[derive(Default)]
pub struct RegisterPage<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub cpf: &'a str,
    pub slug: &'a str,
    pub error: Option<&'a str>,
}

pub fn register(page: &RegisterPage<'_>) -> String {
    let body = format!(
        r#"<section class="card">
<h1>Cadastro de membro</h1>
<p>Somente CPFs autorizados pela comissão podem se cadastrar.</p>
{error}
<form method="post" action="/register">
<input type="hidden" name="slug" value="{slug}">
<label for="name">Nome completo</label>
<input id="name" name="name" value="{name}" required>
<label for="email">Email</label>
<input id="email" name="email" type="email" value="{email}" required>
<label for="cpf">CPF</label>
<input id="cpf" name="cpf" value="{cpf}" placeholder="000.000.000-00" required>
<label for="password">Senha</label>
<input id="password" name="password" type="password" minlength="6" required>
<label for="confirmPassword">Confirmar senha</label>
<input id="confirmPassword" name="confirmPassword" type="password" minlength="6" required>
<button type="submit">Cadastrar</button>
</form>
<p>Já tem conta? <a href="/login">Entrar</a></p>
</section>"#,
        error = message("error", page.error),
        slug = escape(page.slug),
        name = escape(page.name),
        email = escape(page.email),
        cpf = escape(page.cpf),
    );

    layout("Cadastro", None, &body)
}

pub fn auth_error(code: Option<&str>) -> String {
    let text = match code {
        Some("AccessDenied") => "Você não tem permissão para acessar esta página.",
        Some("SessionExpired") => "Sua sessão expirou. Entre novamente.",
        Some("CredentialsSignin") => "CPF ou senha inválidos.",
        _ => "Não foi possível concluir a autenticação.",
    };

    let body = format!(
        r#"<section class="card">
<h1>Acesso negado</h1>
<p class="error">{text}</p>
<p><a href="/dashboard">Voltar ao painel</a> · <a href="/login">Entrar com outra conta</a></p>
</section>"#
    );

    layout("Acesso negado", None, &body)
}
