use std::collections::HashMap;

use axum::{
    Extension, Form,
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{Html, Response},
};

use crate::{
    constants::{MAX_RECEIPT_SIZE, MonthlyStatus},
    dto::{
        financial::{
            GenerateMonthliesForm, MonthlyStatusForm, NewCardForm, NewMonthlyForm,
            TransactionUpload,
        },
        flash::FlashQuery,
    },
    error::{AppError, PageResult},
    repository::{self, transaction::NewTransaction},
    routes::{default_association, redirect_back},
    state::AppState,
    usecases::{dashboard::summarize, report::StatusCounts, session::Session},
    utils::{fmt_brl, local_today, month_start, receipt_file_name, reference_month},
    views::{self, financial::FinancialPage},
};

const PAGE: &str = "/financial";
const RECENT: u32 = 20;

pub async fn get_financial(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(flash): Query<FlashQuery>,
) -> PageResult<Html<String>> {
    let db = &state.db;
    let today = local_today(state.config.utc_offset_hours);

    let (month_transactions, recent, status_rows, pending_cards, recent_monthlies, recent_cards) =
        tokio::try_join!(
            repository::transaction::fetch_since(db, month_start(today)),
            repository::transaction::fetch_recent(db, RECENT),
            repository::monthly::count_by_status(db, None),
            repository::card::pending_summary(db),
            repository::monthly::fetch_recent(db, RECENT),
            repository::card::fetch_recent(db, RECENT),
        )?;

    let (players, monthly_fee_cents) = if session.is_committee() {
        let players = repository::player::fetch_active_names(db).await?;
        let fee = default_association(&state)
            .await
            .map(|a| a.monthly_fee_cents)
            .unwrap_or_default();
        (players, fee)
    } else {
        (Vec::new(), 0)
    };

    let month = reference_month(today);
    let today = today.format("%Y-%m-%d").to_string();

    let page = FinancialPage {
        month: &month,
        totals: summarize(&month_transactions),
        monthlies: StatusCounts::from_rows(&status_rows),
        pending_cards,
        transactions: &recent,
        recent_monthlies: &recent_monthlies,
        recent_cards: &recent_cards,
        players: &players,
        monthly_fee_cents,
        today: &today,
        notice: flash.notice.as_deref(),
        error: flash.error.as_deref(),
    };

    Ok(Html(views::financial::render(&session, &page)))
}

async fn read_fields(multipart: &mut Multipart) -> Result<HashMap<String, Bytes>, AppError> {
    let mut fields = HashMap::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Err(too_large());
            },
            Err(e) => return Err(AppError::validation(e.body_text())),
        };

        let name = field.name().unwrap_or_default().to_owned();
        let content = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                too_large()
            } else {
                AppError::validation(e.body_text())
            }
        })?;

        fields.insert(name, content);
    }

    Ok(fields)
}

fn too_large() -> AppError {
    AppError::PayloadTooLarge("Arquivo muito grande (máximo 10MB)".into())
}

async fn create_transaction(state: &AppState, multipart: &mut Multipart) -> Result<String, AppError> {
    let upload = TransactionUpload::from_fields(read_fields(multipart).await?)?;

    let receipt = match &upload.receipt {
        Some(data) if data.len() > MAX_RECEIPT_SIZE => return Err(too_large()),
        Some(data) => {
            let name = receipt_file_name(data).ok_or_else(|| {
                AppError::validation("Formato de comprovante não suportado (use PDF, JPEG ou PNG)")
            })?;

            state.storage.save_receipt(&name, data).await?;
            Some(name)
        },
        None => None,
    };

    let id = repository::transaction::insert(
        &state.db,
        &NewTransaction {
            kind: upload.kind,
            category: &upload.category,
            amount_cents: upload.amount_cents,
            date: upload.date,
            description: &upload.description,
            receipt: receipt.as_deref(),
        },
    )
    .await?;

    tracing::info!(transaction_id = id, kind = upload.kind.as_str(), "transaction recorded");

    Ok(format!(
        "{} de {} registrada",
        upload.kind.label(),
        fmt_brl(upload.amount_cents)
    ))
}

pub async fn post_transaction(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    redirect_back(PAGE, create_transaction(&state, &mut multipart).await)
}

async fn create_monthly(state: &AppState, form: &NewMonthlyForm) -> Result<String, AppError> {
    let draft = form.validate()?;

    if repository::player::fetch_by_id(&state.db, draft.player_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Jogador não encontrado".into()));
    }

    repository::monthly::create(
        &state.db,
        draft.player_id,
        draft.amount_cents,
        &draft.reference_month,
        draft.due_date,
    )
    .await?
    .ok_or_else(|| AppError::Conflict("Mensalidade já lançada para este mês".into()))?;

    Ok(format!("Mensalidade de {} lançada", draft.reference_month))
}

pub async fn post_monthly(State(state): State<AppState>, Form(form): Form<NewMonthlyForm>) -> Response {
    redirect_back(PAGE, create_monthly(&state, &form).await)
}

async fn generate_monthlies(
    state: &AppState,
    form: &GenerateMonthliesForm,
) -> Result<String, AppError> {
    let (month, due_date) = form.validate()?;
    let fee = default_association(state).await?.monthly_fee_cents;

    if fee <= 0 {
        return Err(AppError::validation(
            "Defina o valor da mensalidade na administração antes de gerar",
        ));
    }

    let created = repository::monthly::generate_for_month(&state.db, &month, fee, due_date).await?;

    tracing::info!(month = %month, created, "monthlies generated");

    Ok(format!("{created} mensalidade(s) gerada(s) para {month}"))
}

pub async fn post_generate_monthlies(
    State(state): State<AppState>,
    Form(form): Form<GenerateMonthliesForm>,
) -> Response {
    redirect_back(PAGE, generate_monthlies(&state, &form).await)
}

async fn change_monthly_status(
    state: &AppState,
    id: u64,
    form: &MonthlyStatusForm,
) -> Result<String, AppError> {
    let status = form.validate()?;
    let today = local_today(state.config.utc_offset_hours);

    if !repository::monthly::update_status(&state.db, id, status, today).await? {
        return Err(AppError::NotFound("Mensalidade não encontrada".into()));
    }

    Ok(match status {
        MonthlyStatus::Paid => "Pagamento registrado".to_string(),
        other => format!("Mensalidade marcada como {}", other.label().to_lowercase()),
    })
}

pub async fn post_monthly_status(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Form(form): Form<MonthlyStatusForm>,
) -> Response {
    redirect_back(PAGE, change_monthly_status(&state, id, &form).await)
}

async fn create_card(state: &AppState, form: &NewCardForm) -> Result<String, AppError> {
    let draft = form.validate()?;

    if repository::player::fetch_by_id(&state.db, draft.player_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Jogador não encontrado".into()));
    }

    repository::card::insert(
        &state.db,
        draft.player_id,
        &draft.description,
        draft.amount_cents,
        draft.date,
    )
    .await?;

    Ok(format!("Cartão de {} lançado", fmt_brl(draft.amount_cents)))
}

pub async fn post_card(State(state): State<AppState>, Form(form): Form<NewCardForm>) -> Response {
    redirect_back(PAGE, create_card(&state, &form).await)
}

async fn pay_card(state: &AppState, id: u64) -> Result<String, AppError> {
    if !repository::card::mark_paid(&state.db, id).await? {
        return Err(AppError::NotFound("Cartão não encontrado ou já pago".into()));
    }

    Ok("Cartão marcado como pago".to_string())
}

pub async fn post_pay_card(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    redirect_back(PAGE, pay_card(&state, id).await)
}
