use btn_device::{AppContext, Config, print_banner, setup_environment};
use btn_device::notifications::next_reminder;
use shared::models::StaffRole;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (.env, logging)
    setup_environment()?;

    print_banner();
    tracing::info!("BTN device starting...");

    // 2. Configuration
    let config = Config::from_env();
    tracing::info!(
        work_dir = %config.work_dir,
        environment = %config.environment,
        staff_config = ?config.staff_config,
        assistant_keys = config.assistant_keys.len(),
        "Configuration loaded"
    );

    // 3. Application context
    let ctx = AppContext::initialize(&config)?;

    // 4. Status summary
    let pending = ctx.orders.pending_orders()?;
    let forwarded = ctx.orders.paid_orders()?;
    let history = ctx.orders.history()?;
    let tables = ctx.session.tables()?;
    let occupied: Vec<&str> = tables
        .iter()
        .filter(|t| t.occupied)
        .map(|t| t.table.id.as_str())
        .collect();

    tracing::info!(
        dishes = ctx.catalog.len(),
        cart_lines = ctx.cart.lines()?.len(),
        pending = pending.len(),
        forwarded = forwarded.len(),
        history = history.len(),
        occupied = ?occupied,
        "Device status"
    );

    for account in ctx
        .staff
        .accounts()
        .iter()
        .filter(|a| a.role == StaffRole::Waiter)
    {
        let assigned = ctx.orders.orders_for_waiter(&account.username)?;
        let tables = ctx.staff.tables_of(&account.username);
        let unread: usize = tables
            .iter()
            .map(|t| ctx.messaging.unread_count(t))
            .sum::<Result<usize, _>>()?;
        tracing::info!(
            waiter = %account.username,
            tables = ?tables,
            orders = assigned.len(),
            unread_messages = unread,
            "Waiter section"
        );
    }

    match ctx.session.current()? {
        Some(session) => tracing::info!(session = ?session, "Active session"),
        None => tracing::info!("No active session"),
    }

    if let Some((reminder, at)) = next_reminder(chrono::Local::now().naive_local()) {
        tracing::info!(title = reminder.title, at = %at, "Next meal reminder");
    }

    tracing::info!("BTN device ready");
    Ok(())
}
