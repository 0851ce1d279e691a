//! Server-rendered pages.
//!
//! Pages are plain strings assembled with `format!`. Every value that came
//! from a user or the database goes through [`escape`] first.

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod error;
pub mod financial;
pub mod landing;
pub mod players;
pub mod reports;

use std::fmt::Write;

use crate::usecases::session::Session;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;background:#f5f7fa;color:#1f2933}\
header{background:#0b3d91;color:#fff;padding:.75rem 1.5rem;display:flex;gap:1rem;align-items:center}\
header a{color:#fff;text-decoration:none}header .spacer{flex:1}\
main{max-width:960px;margin:1.5rem auto;padding:0 1rem}\
.card{background:#fff;border-radius:8px;padding:1rem 1.25rem;margin-bottom:1rem;box-shadow:0 1px 3px rgba(0,0,0,.08)}\
.grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(180px,1fr));gap:1rem}\
.stat strong{display:block;font-size:1.5rem}\
table{width:100%;border-collapse:collapse}td,th{padding:.4rem;border-bottom:1px solid #e4e7eb;text-align:left}\
.badge{padding:.1rem .5rem;border-radius:999px;font-size:.8rem;background:#e4e7eb}\
.ok{background:#c6f7e2}.warn{background:#fff3c4}.bad{background:#ffd6d6}\
.error{color:#b00020}.notice{color:#0b6e4f}\
form.inline{display:inline}label{display:block;margin:.5rem 0 .2rem}input,select{padding:.35rem;width:100%;box-sizing:border-box}\
button{margin-top:.75rem;padding:.45rem 1rem;background:#0b3d91;color:#fff;border:0;border-radius:4px;cursor:pointer}";

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }

    out
}

fn nav(session: Option<&Session>) -> String {
    let Some(session) = session else {
        return r#"<span class="spacer"></span><a href="/login">Entrar</a><a href="/register">Cadastrar</a>"#
            .to_string();
    };

    let mut links = String::from(
        r#"<a href="/dashboard">Painel</a><a href="/players">Jogadores</a><a href="/financial">Financeiro</a><a href="/reports">Relatórios</a>"#,
    );

    if session.is_committee() {
        links.push_str(r#"<a href="/admin">Administração</a>"#);
    }

    let _ = write!(
        links,
        r#"<span class="spacer"></span><span>{} ({})</span>
<form class="inline" method="post" action="/logout"><button type="submit">Sair</button></form>"#,
        escape(&session.name),
        session.role.label(),
    );

    links
}

pub fn layout(title: &str, session: Option<&Session>, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Porto dos Santos</title>
<style>{STYLE}</style>
</head>
<body>
<header><a href="/"><strong>Porto dos Santos</strong></a>{nav}</header>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
        nav = nav(session),
    )
}

/// `<p class="error">` when there is something to report.
pub fn message(class: &str, text: Option<&str>) -> String {
    text.filter(|t| !t.is_empty())
        .map(|t| format!(r#"<p class="{class}">{}</p>"#, escape(t)))
        .unwrap_or_default()
}
