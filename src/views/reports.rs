use crate::{
    usecases::{
        report::{AnnualReport, MonthlyReport},
        session::Session,
    },
    utils::{fmt_brl, fmt_date},
    views::{escape, layout},
};

pub fn render(session: &Session, monthly: &MonthlyReport, annual: &AnnualReport) -> String {
    let categories = monthly
        .categories
        .iter()
        .map(|c| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&c.kind),
                escape(&c.category),
                fmt_brl(c.amount_cents)
            )
        })
        .collect::<String>();

    let cards = monthly
        .cards
        .iter()
        .map(|c| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                fmt_date(c.date),
                escape(&c.player_name),
                escape(&c.description),
                fmt_brl(c.amount_cents),
                c.status().label()
            )
        })
        .collect::<String>();

    let months = annual
        .months
        .iter()
        .map(|m| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                m.month,
                fmt_brl(m.totals.revenue_cents),
                fmt_brl(m.totals.expenses_cents),
                fmt_brl(m.totals.balance_cents)
            )
        })
        .collect::<String>();

    let body = format!(
        r#"<h1>Relatórios</h1>
<form method="get" action="/reports">
<label for="month">Mês</label><input id="month" name="month" value="{month}" placeholder="AAAA-MM">
<label for="year">Ano</label><input id="year" name="year" type="number" value="{year}">
<button type="submit">Atualizar</button>
</form>
<section class="card">
<h2>{month}</h2>
<p>Receitas {revenue} · Despesas {expenses} · Saldo <strong>{balance}</strong></p>
<p>Mensalidades: {paid} pagas, {open} em aberto, {overdue} vencidas</p>
<table><tr><th>Tipo</th><th>Categoria</th><th>Total</th></tr>{categories}</table>
<h3>Cartões do mês (pendente: {cards_pending})</h3>
<table><tr><th>Data</th><th>Jogador</th><th>Descrição</th><th>Valor</th><th>Status</th></tr>{cards}</table>
</section>
<section class="card">
<h2>{year}</h2>
<table><tr><th>Mês</th><th>Receitas</th><th>Despesas</th><th>Saldo</th></tr>{months}
<tr><th>Total</th><th>{year_revenue}</th><th>{year_expenses}</th><th>{year_balance}</th></tr></table>
</section>"#,
        month = escape(&monthly.month),
        year = annual.year,
        revenue = fmt_brl(monthly.totals.revenue_cents),
        expenses = fmt_brl(monthly.totals.expenses_cents),
        balance = fmt_brl(monthly.totals.balance_cents),
        paid = monthly.monthlies.paid,
        open = monthly.monthlies.open,
        overdue = monthly.monthlies.overdue,
        cards_pending = fmt_brl(monthly.cards_pending_cents),
        year_revenue = fmt_brl(annual.totals.revenue_cents),
        year_expenses = fmt_brl(annual.totals.expenses_cents),
        year_balance = fmt_brl(annual.totals.balance_cents),
    );

    layout("Relatórios", Some(session), &body)
}
