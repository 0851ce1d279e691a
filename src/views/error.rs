use axum::http::StatusCode;

use crate::views::{escape, layout};

pub fn render(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<section class="card">
<h1>{code}</h1>
<p>{message}</p>
<p><a href="/">Voltar ao início</a></p>
</section>"#,
        code = status.as_u16(),
        message = escape(message),
    );

    layout(status.canonical_reason().unwrap_or("Erro"), None, &body)
}
