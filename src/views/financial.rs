use crate::{
    constants::{CardStatus, MonthlyStatus, TransactionKind},
    models::{CardListing, MonthlyListing, Transaction},
    usecases::{dashboard::Totals, report::StatusCounts, session::Session},
    utils::{fmt_brl, fmt_date, url_encode},
    views::{dashboard::monthly_badge, escape, layout, message},
};

pub struct FinancialPage<'a> {
    pub month: &'a str,
    pub totals: Totals,
    pub monthlies: StatusCounts,
    pub pending_cards: (i64, i64),
    pub transactions: &'a [Transaction],
    pub recent_monthlies: &'a [MonthlyListing],
    pub recent_cards: &'a [CardListing],
    /// Select options for committee forms; empty for players.
    pub players: &'a [(u64, String)],
    pub monthly_fee_cents: i64,
    pub today: &'a str,
    pub notice: Option<&'a str>,
    pub error: Option<&'a str>,
}

fn receipt_link(receipt: Option<&str>) -> String {
    receipt
        .map(|r| format!(r#"<a href="/receipts/{}">comprovante</a>"#, url_encode(r)))
        .unwrap_or_default()
}

fn player_options(players: &[(u64, String)]) -> String {
    players
        .iter()
        .map(|(id, name)| format!(r#"<option value="{id}">{}</option>"#, escape(name)))
        .collect()
}

fn committee_forms(page: &FinancialPage<'_>) -> String {
    let options = player_options(page.players);
    let fee = fmt_brl(page.monthly_fee_cents);
    let fee_input = fee.trim_start_matches("R$ ");

    let kinds = [TransactionKind::Inflow, TransactionKind::Outflow]
        .iter()
        .map(|k| format!(r#"<option value="{}">{}</option>"#, k.as_str(), k.label()))
        .collect::<String>();

    format!(
        r#"<section class="grid">
<form class="card" method="post" action="/financial/transactions" enctype="multipart/form-data">
<h3>Nova transação</h3>
<label>Tipo</label><select name="kind">{kinds}</select>
<label>Categoria</label><input name="category" required>
<label>Valor</label><input name="amount" placeholder="0,00" required>
<label>Data</label><input name="date" type="date" value="{today}" required>
<label>Descrição</label><input name="description" required>
<label>Comprovante (PDF, JPEG ou PNG)</label><input name="receipt" type="file" accept=".pdf,.jpg,.jpeg,.png">
<button type="submit">Registrar</button>
</form>
<form class="card" method="post" action="/financial/monthlies">
<h3>Nova mensalidade</h3>
<label>Jogador</label><select name="player_id">{options}</select>
<label>Valor</label><input name="amount" value="{fee_input}" required>
<label>Mês de referência</label><input name="reference_month" value="{month}" placeholder="AAAA-MM" required>
<label>Vencimento</label><input name="due_date" type="date" required>
<button type="submit">Lançar</button>
</form>
<form class="card" method="post" action="/financial/monthlies/generate">
<h3>Gerar mensalidades do mês</h3>
<p>Lança {fee} para cada jogador ativo que ainda não tem mensalidade no mês.</p>
<label>Mês de referência</label><input name="reference_month" value="{month}" required>
<label>Vencimento</label><input name="due_date" type="date" required>
<button type="submit">Gerar</button>
</form>
<form class="card" method="post" action="/financial/cards">
<h3>Novo cartão</h3>
<label>Jogador</label><select name="player_id">{options}</select>
<label>Descrição</label><input name="description" required>
<label>Valor</label><input name="amount" required>
<label>Data</label><input name="date" type="date" value="{today}" required>
<button type="submit">Lançar</button>
</form>
</section>"#,
        today = escape(page.today),
        month = escape(page.month),
    )
}

fn monthly_row(m: &MonthlyListing, committee: bool) -> String {
    let actions = if committee {
        let options = [MonthlyStatus::Paid, MonthlyStatus::Open, MonthlyStatus::Overdue]
            .iter()
            .map(|s| {
                let selected = if *s == m.status() { " selected" } else { "" };
                format!(r#"<option value="{}"{selected}>{}</option>"#, s.as_str(), s.label())
            })
            .collect::<String>();

        format!(
            r#"<form class="inline" method="post" action="/financial/monthlies/{}/status"><select name="status">{options}</select><button type="submit">Salvar</button></form>"#,
            m.id
        )
    } else {
        String::new()
    };

    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{actions}</td></tr>",
        escape(&m.player_name),
        escape(&m.reference_month),
        fmt_brl(m.amount_cents),
        m.payment_date.map(fmt_date).unwrap_or_else(|| fmt_date(m.due_date)),
        monthly_badge(m.status()),
    )
}

fn card_row(c: &CardListing, committee: bool) -> String {
    let action = if committee && c.status() == CardStatus::Pending {
        format!(
            r#"<form class="inline" method="post" action="/financial/cards/{}/pay"><button type="submit">Marcar pago</button></form>"#,
            c.id
        )
    } else {
        String::new()
    };

    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{action}</td></tr>",
        fmt_date(c.date),
        escape(&c.player_name),
        escape(&c.description),
        fmt_brl(c.amount_cents),
        c.status().label(),
    )
}

pub fn render(session: &Session, page: &FinancialPage<'_>) -> String {
    let committee = session.is_committee();
    let t = &page.totals;

    let transactions = page
        .transactions
        .iter()
        .map(|tx| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                fmt_date(tx.date),
                tx.kind().label(),
                escape(&tx.category),
                escape(&tx.description),
                fmt_brl(tx.amount_cents),
                receipt_link(tx.receipt.as_deref()),
            )
        })
        .collect::<String>();

    let monthlies = page
        .recent_monthlies
        .iter()
        .map(|m| monthly_row(m, committee))
        .collect::<String>();

    let cards = page
        .recent_cards
        .iter()
        .map(|c| card_row(c, committee))
        .collect::<String>();

    let forms = if committee {
        committee_forms(page)
    } else {
        String::new()
    };

    let body = format!(
        r#"<h1>Financeiro</h1>
{notice}{error}
<section class="grid">
<div class="card stat"><span>Receitas ({month})</span><strong>{revenue}</strong></div>
<div class="card stat"><span>Despesas ({month})</span><strong>{expenses}</strong></div>
<div class="card stat"><span>Saldo ({month})</span><strong>{balance}</strong></div>
<div class="card stat"><span>Mensalidades</span><strong>{paid} pagas · {open} em aberto · {overdue} vencidas</strong></div>
<div class="card stat"><span>Cartões pendentes</span><strong>{cards_count} · {cards_total}</strong></div>
</section>
{forms}
<section class="card">
<h2>Últimas transações</h2>
<table><tr><th>Data</th><th>Tipo</th><th>Categoria</th><th>Descrição</th><th>Valor</th><th></th></tr>{transactions}</table>
</section>
<section class="card">
<h2>Mensalidades</h2>
<table><tr><th>Jogador</th><th>Mês</th><th>Valor</th><th>Pagamento/Vencimento</th><th>Status</th><th></th></tr>{monthlies}</table>
</section>
<section class="card">
<h2>Cartões</h2>
<table><tr><th>Data</th><th>Jogador</th><th>Descrição</th><th>Valor</th><th>Status</th><th></th></tr>{cards}</table>
</section>"#,
        notice = message("notice", page.notice),
        error = message("error", page.error),
        month = escape(page.month),
        revenue = fmt_brl(t.revenue_cents),
        expenses = fmt_brl(t.expenses_cents),
        balance = fmt_brl(t.balance_cents),
        paid = page.monthlies.paid,
        open = page.monthlies.open,
        overdue = page.monthlies.overdue,
        cards_count = page.pending_cards.0,
        cards_total = fmt_brl(page.pending_cards.1),
    );

    layout("Financeiro", Some(session), &body)
}
