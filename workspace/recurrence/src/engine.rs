use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use model::entities::transaction;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::error::Result;
use crate::midnight;
use crate::plan::{CatchUpPlan, plan_for};

/// How the work of one tick is split into database transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitMode {
    /// Every template commits on its own. A failing template is rolled back
    /// alone and the rest of the tick carries on.
    #[default]
    PerTemplate,
    /// The whole tick is one transaction. It is committed only when at least
    /// one occurrence was produced and any failure rolls everything back.
    PerTick,
}

impl fmt::Display for CommitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitMode::PerTemplate => f.write_str("per-template"),
            CommitMode::PerTick => f.write_str("per-tick"),
        }
    }
}

impl FromStr for CommitMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "per-template" => Ok(CommitMode::PerTemplate),
            "per-tick" => Ok(CommitMode::PerTick),
            other => Err(format!(
                "unknown commit mode '{}', expected 'per-template' or 'per-tick'",
                other
            )),
        }
    }
}

/// What one catch-up run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatchUpReport {
    pub today: NaiveDate,
    /// Templates flagged recurring that were looked at.
    pub templates_scanned: usize,
    /// Templates whose watermark moved.
    pub templates_advanced: usize,
    pub occurrences_created: usize,
    /// Templates skipped because their frequency is empty or unknown.
    pub inert_templates: usize,
    /// Templates changed by someone else between read and write.
    pub conflicts: usize,
    /// Templates whose transaction failed and was rolled back.
    pub failures: usize,
}

impl CatchUpReport {
    /// An empty report for a run catching up to `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            templates_scanned: 0,
            templates_advanced: 0,
            occurrences_created: 0,
            inert_templates: 0,
            conflicts: 0,
            failures: 0,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.occurrences_created == 0
    }
}

/// Result of applying one template's plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TemplateOutcome {
    Inert,
    UpToDate,
    Advanced(usize),
    Conflict,
}

/// Materialises the occurrences owed by recurring templates.
///
/// Cloning is cheap and clones share the run lock, so overlapping calls on
/// the same engine are serialised.
#[derive(Debug, Clone, Default)]
pub struct CatchUpEngine {
    commit_mode: CommitMode,
    run_lock: Arc<Mutex<()>>,
}

impl CatchUpEngine {
    pub fn new(commit_mode: CommitMode) -> Self {
        Self {
            commit_mode,
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn commit_mode(&self) -> CommitMode {
        self.commit_mode
    }

    /// Creates every occurrence due on or before `today` and advances the
    /// watermarks past them.
    ///
    /// `conn` may be a plain connection or a caller's open transaction. In the
    /// latter case the transactions opened here are savepoints and the caller's
    /// commit or rollback decides what is kept.
    ///
    /// Calling this again with the same `today` creates nothing.
    #[instrument(skip(self, conn), fields(today = %today, commit_mode = %self.commit_mode))]
    pub async fn catch_up<C>(&self, conn: &C, today: NaiveDate) -> Result<CatchUpReport>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let _running = self.run_lock.lock().await;
        trace!("Acquired catch-up run lock");

        let report = match self.commit_mode {
            CommitMode::PerTemplate => catch_up_per_template(conn, today).await?,
            CommitMode::PerTick => catch_up_per_tick(conn, today).await?,
        };

        if report.is_noop() {
            info!(
                templates = report.templates_scanned,
                "Nothing to do: no recurring transaction is due"
            );
        } else {
            info!(
                occurrences = report.occurrences_created,
                templates = report.templates_advanced,
                "Created {} new occurrences",
                report.occurrences_created
            );
        }
        if report.conflicts > 0 || report.failures > 0 {
            warn!(
                conflicts = report.conflicts,
                failures = report.failures,
                "Some templates were left for the next tick"
            );
        }

        Ok(report)
    }
}

async fn load_templates<C: ConnectionTrait>(conn: &C) -> Result<Vec<transaction::Model>> {
    let templates = transaction::Entity::find()
        .filter(transaction::Column::IsRecurrent.eq(true))
        .order_by_asc(transaction::Column::Id)
        .all(conn)
        .await?;
    debug!("Loaded {} recurring templates", templates.len());
    Ok(templates)
}

async fn catch_up_per_template<C>(conn: &C, today: NaiveDate) -> Result<CatchUpReport>
where
    C: ConnectionTrait + TransactionTrait,
{
    let mut report = CatchUpReport::new(today);

    for template in load_templates(conn).await? {
        report.templates_scanned += 1;
        match process_isolated(conn, &template, today).await {
            Ok(outcome) => record(&mut report, outcome),
            Err(e) => {
                error!(template_id = template.id, "Catch-up failed, rolled back: {}", e);
                report.failures += 1;
            }
        }
    }

    Ok(report)
}

/// Runs one template inside its own transaction.
async fn process_isolated<C>(
    conn: &C,
    template: &transaction::Model,
    today: NaiveDate,
) -> Result<TemplateOutcome>
where
    C: ConnectionTrait + TransactionTrait,
{
    let plan = plan_for(template, today);
    if let Some(outcome) = skip_reason(template, &plan) {
        return Ok(outcome);
    }

    let txn = conn.begin().await?;
    match apply_plan(&txn, template, &plan, today).await {
        Ok(TemplateOutcome::Advanced(created)) => {
            txn.commit().await?;
            Ok(TemplateOutcome::Advanced(created))
        }
        Ok(outcome) => {
            txn.rollback().await?;
            Ok(outcome)
        }
        Err(e) => {
            if let Err(rollback_error) = txn.rollback().await {
                error!(template_id = template.id, "Rollback failed: {}", rollback_error);
            }
            Err(e)
        }
    }
}

async fn catch_up_per_tick<C>(conn: &C, today: NaiveDate) -> Result<CatchUpReport>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = conn.begin().await?;

    let result = async {
        let mut report = CatchUpReport::new(today);
        for template in load_templates(&txn).await? {
            report.templates_scanned += 1;
            let plan = plan_for(&template, today);
            let outcome = match skip_reason(&template, &plan) {
                Some(outcome) => outcome,
                None => apply_plan(&txn, &template, &plan, today).await?,
            };
            record(&mut report, outcome);
        }
        Ok::<_, crate::error::RecurrenceError>(report)
    }
    .await;

    match result {
        Ok(report) if report.occurrences_created > 0 => {
            txn.commit().await?;
            debug!("Committed tick with {} occurrences", report.occurrences_created);
            Ok(report)
        }
        Ok(report) => {
            // Nothing generated: leave no trace of the tick.
            txn.rollback().await?;
            Ok(report)
        }
        Err(e) => {
            error!("Catch-up tick failed, rolling back every template: {}", e);
            if let Err(rollback_error) = txn.rollback().await {
                error!("Rollback failed: {}", rollback_error);
            }
            Err(e)
        }
    }
}

fn skip_reason(template: &transaction::Model, plan: &CatchUpPlan) -> Option<TemplateOutcome> {
    if template.parsed_frequency().is_none() {
        warn!(
            template_id = template.id,
            frequency = ?template.frequency,
            "Skipping recurring template with an empty or unknown frequency"
        );
        return Some(TemplateOutcome::Inert);
    }
    if plan.is_empty() {
        trace!(template_id = template.id, watermark = %plan.watermark, "Template is up to date");
        return Some(TemplateOutcome::UpToDate);
    }
    None
}

fn record(report: &mut CatchUpReport, outcome: TemplateOutcome) {
    match outcome {
        TemplateOutcome::Inert => report.inert_templates += 1,
        TemplateOutcome::UpToDate => {}
        TemplateOutcome::Advanced(created) => {
            report.templates_advanced += 1;
            report.occurrences_created += created;
        }
        TemplateOutcome::Conflict => report.conflicts += 1,
    }
}

/// Moves the watermark and inserts the planned occurrences through `conn`.
///
/// The watermark only moves if the template still is what was read: still
/// recurring, same frequency, same watermark. Otherwise nothing is written and
/// `Conflict` is returned; the caller discards its transaction.
pub(crate) async fn apply_plan<C: ConnectionTrait>(
    conn: &C,
    template: &transaction::Model,
    plan: &CatchUpPlan,
    today: NaiveDate,
) -> Result<TemplateOutcome> {
    use transaction::Column;

    let frequency_unchanged = match &template.frequency {
        Some(frequency) => Column::Frequency.eq(frequency.clone()),
        None => Column::Frequency.is_null(),
    };
    let watermark_unchanged = match template.last_launch_date {
        Some(launched) => Column::LastLaunchDate.eq(launched),
        None => Column::LastLaunchDate.is_null(),
    };

    let updated = transaction::Entity::update_many()
        .col_expr(Column::LastLaunchDate, Expr::value(midnight(plan.watermark)))
        .filter(Column::Id.eq(template.id))
        .filter(Column::IsRecurrent.eq(true))
        .filter(frequency_unchanged)
        .filter(watermark_unchanged)
        .exec(conn)
        .await?;

    if updated.rows_affected == 0 {
        warn!(
            template_id = template.id,
            "Template changed while catching up, leaving it for the next tick"
        );
        return Ok(TemplateOutcome::Conflict);
    }

    let occurrences = plan
        .due_dates
        .iter()
        .map(|due_date| occurrence_of(template, *due_date, today));
    transaction::Entity::insert_many(occurrences).exec(conn).await?;

    debug!(
        template_id = template.id,
        created = plan.len(),
        watermark = %plan.watermark,
        "Advanced recurring template"
    );
    Ok(TemplateOutcome::Advanced(plan.len()))
}

/// The concrete transaction a template produces for one due date.
///
/// Occurrences are stamped with the generation day, start unpaid and never
/// recur themselves.
pub fn occurrence_of(
    template: &transaction::Model,
    due_date: NaiveDate,
    today: NaiveDate,
) -> transaction::ActiveModel {
    transaction::ActiveModel {
        description: Set(template.description.clone()),
        amount: Set(template.amount),
        date: Set(midnight(today)),
        due_date: Set(due_date),
        kind: Set(template.kind),
        is_recurrent: Set(false),
        frequency: Set(None),
        last_launch_date: Set(None),
        is_paid: Set(false),
        payment_date: Set(None),
        user_id: Set(template.user_id),
        wallet_id: Set(template.wallet_id),
        category_id: Set(template.category_id),
        ..Default::default()
    }
}
