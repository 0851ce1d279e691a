use crate::{
    constants::MonthlyStatus,
    usecases::{
        dashboard::{DashboardSummary, PlayerOverview},
        session::Session,
    },
    utils::{fmt_brl, fmt_date, fmt_n},
    views::{escape, layout},
};

fn stat(label: &str, value: &str) -> String {
    format!(r#"<div class="card stat"><span>{label}</span><strong>{value}</strong></div>"#)
}

pub(crate) fn monthly_badge(status: MonthlyStatus) -> String {
    let class = match status {
        MonthlyStatus::Paid => "ok",
        MonthlyStatus::Open => "warn",
        MonthlyStatus::Overdue => "bad",
    };

    format!(r#"<span class="badge {class}">{}</span>"#, status.label())
}

fn player_section(overview: &PlayerOverview) -> String {
    let heading = overview
        .player
        .as_ref()
        .map(|p| {
            format!(
                "{} #{} · {}",
                escape(&p.nickname),
                p.shirt_number,
                escape(&p.position)
            )
        })
        .unwrap_or_else(|| "Minha situação".to_string());

    let monthlies = if overview.monthlies.is_empty() {
        "<tr><td colspan=\"4\">Nenhuma mensalidade registrada.</td></tr>".to_string()
    } else {
        overview
            .monthlies
            .iter()
            .map(|m| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape(&m.reference_month),
                    fmt_brl(m.amount_cents),
                    fmt_date(m.due_date),
                    monthly_badge(m.status()),
                )
            })
            .collect()
    };

    let cards = overview
        .cards
        .iter()
        .map(|c| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                fmt_date(c.date),
                escape(&c.description),
                fmt_brl(c.amount_cents),
                c.status().label(),
            )
        })
        .collect::<String>();

    format!(
        r#"<section class="card">
<h2>{heading}</h2>
<p>Em aberto: <strong>{pending}</strong></p>
<h3>Mensalidades</h3>
<table><tr><th>Mês</th><th>Valor</th><th>Vencimento</th><th>Status</th></tr>{monthlies}</table>
<h3>Cartões</h3>
<table><tr><th>Data</th><th>Descrição</th><th>Valor</th><th>Status</th></tr>{cards}</table>
</section>"#,
        pending = fmt_brl(overview.pending_cents()),
    )
}

pub fn render(
    session: &Session,
    summary: &DashboardSummary,
    overview: Option<&PlayerOverview>,
) -> String {
    let t = &summary.totals;

    let body = format!(
        r#"<h1>Olá, {name}</h1>
<section class="grid">
{players}{active}{pending}
</section>
<h2>Financeiro de {month}</h2>
<section class="grid">
{revenue}{expenses}{balance}
</section>
{own}"#,
        name = escape(&session.name),
        players = stat("Jogadores", &fmt_n(summary.total_players)),
        active = stat("Ativos", &fmt_n(summary.active_players)),
        pending = stat("Mensalidades pendentes", &fmt_n(summary.pending_monthlies)),
        month = escape(&summary.month),
        revenue = stat("Receitas", &fmt_brl(t.revenue_cents)),
        expenses = stat("Despesas", &fmt_brl(t.expenses_cents)),
        balance = stat("Saldo", &fmt_brl(t.balance_cents)),
        own = overview.map(player_section).unwrap_or_default(),
    );

    layout("Painel", Some(session), &body)
}
