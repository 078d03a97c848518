use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use logistics_admin::client::HttpBackend;
use logistics_admin::config::AdminConfig;
use logistics_admin::controllers::{
    ConsumersController, OrdersController, UsersController, ZonesController,
};
use logistics_admin::core::query::{ListFilter, PaginationMeta};
use logistics_admin::core::service::AdminBackend;
use logistics_admin::core::session::Session;
use logistics_admin::core::status::{OrderStatus, next_transition};
use logistics_admin::display::{Table, format_currency, format_date, format_optional_date};
use logistics_admin::entities::{AccountStatus, LoginCredentials, Order, ZoneDraft};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "logistics-admin")]
#[command(about = "Back-office client for the logistics admin API", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Bearer token from a previous `login`
    #[arg(long, env = "ADMIN_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange credentials for a token and print it
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Orders and their status workflow
    Orders {
        #[command(subcommand)]
        cmd: OrdersCmd,
    },

    /// Delivery zones
    Zones {
        #[command(subcommand)]
        cmd: ZonesCmd,
    },

    /// Platform users
    Users {
        #[command(subcommand)]
        cmd: UsersCmd,
    },

    /// Consumer accounts
    Consumers {
        #[command(subcommand)]
        cmd: ConsumersCmd,
    },
}

#[derive(Args, Clone)]
struct PageArgs {
    /// Page to show (1-based)
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Rows per page; defaults to the configured page limit
    #[arg(long)]
    limit: Option<u32>,
}

#[derive(Args, Clone)]
struct OrderFilterArgs {
    #[command(flatten)]
    paging: PageArgs,

    /// Only orders in this status (e.g. PENDING, in-transit)
    #[arg(long)]
    status: Option<OrderStatus>,

    /// Created on or after (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Created on or before (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Free text search
    #[arg(long)]
    search: Option<String>,
}

#[derive(Subcommand)]
enum OrdersCmd {
    /// List orders
    List {
        #[command(flatten)]
        filter: OrderFilterArgs,
    },

    /// Apply the single next step offered for an order on the selected page
    Advance {
        order_id: String,

        #[command(flatten)]
        filter: OrderFilterArgs,
    },

    /// Move an order on the selected page to a specific status
    SetStatus {
        order_id: String,

        status: OrderStatus,

        #[command(flatten)]
        filter: OrderFilterArgs,
    },
}

#[derive(Subcommand)]
enum ZonesCmd {
    /// List all zones
    List,

    /// Create a zone
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        price: f64,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Edit a zone; omitted fields keep their current value
    Update {
        zone_id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a zone
    Delete { zone_id: String },
}

#[derive(Subcommand)]
enum UsersCmd {
    /// List users
    List {
        #[command(flatten)]
        paging: PageArgs,
    },

    /// Show a user and their orders
    Show { user_id: String },
}

#[derive(Subcommand)]
enum ConsumersCmd {
    /// List consumers
    List {
        #[command(flatten)]
        paging: PageArgs,

        /// active or inactive
        #[arg(long)]
        status: Option<AccountStatus>,

        #[arg(long)]
        search: Option<String>,
    },

    /// Aggregate consumer counts
    Stats,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("operation failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AdminConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let backend = Arc::new(HttpBackend::new(&config.api)?);
    let page_limit = config.defaults.page_limit;

    if let Commands::Login { email, password } = &cli.cmd {
        let session = backend
            .login(&LoginCredentials::new(email.as_str(), password.as_str()))
            .await
            .context("login")?;
        if let Some(admin) = session.admin() {
            eprintln!("logged in as {} <{}>", admin.name, admin.email);
        }
        println!("{}", session.token().expose_secret());
        return Ok(());
    }

    let token = cli
        .token
        .clone()
        .context("no token: pass --token or set ADMIN_TOKEN (see `login`)")?;
    let session = Session::from_token(token);

    match cli.cmd {
        Commands::Login { .. } => Ok(()),
        Commands::Orders { cmd } => orders(backend, &session, cmd, page_limit).await,
        Commands::Zones { cmd } => zones(backend, &session, cmd).await,
        Commands::Users { cmd } => users(backend, &session, cmd, page_limit).await,
        Commands::Consumers { cmd } => consumers(backend, &session, cmd, page_limit).await,
    }
}

fn order_filter(args: &OrderFilterArgs, page_limit: u32) -> ListFilter<OrderStatus> {
    ListFilter {
        status: args.status,
        start_date: args.from,
        end_date: args.to,
        search: args.search.clone().filter(|s| !s.trim().is_empty()),
        ..ListFilter::with_limit(args.paging.limit.unwrap_or(page_limit))
    }
}

/// Load the first page, then navigate to the requested one
async fn open_orders(
    backend: Arc<HttpBackend>,
    session: &Session,
    args: &OrderFilterArgs,
    page_limit: u32,
) -> Result<OrdersController<HttpBackend>> {
    let mut controller = OrdersController::with_filter(backend, order_filter(args, page_limit));
    controller.refresh(session).await?;
    let page = args.paging.page;
    if page != 1 && !controller.list_mut().go_to_page(session, page).await? {
        eprintln!(
            "page {} is out of range (1-{}); showing page 1",
            page,
            controller.list().pagination().pages.max(1)
        );
    }
    Ok(controller)
}

async fn orders(
    backend: Arc<HttpBackend>,
    session: &Session,
    cmd: OrdersCmd,
    page_limit: u32,
) -> Result<()> {
    match cmd {
        OrdersCmd::List { filter } => {
            let controller = open_orders(backend, session, &filter, page_limit).await?;
            print_orders(controller.list().items());
            print_pagination(controller.list().pagination());
        }
        OrdersCmd::Advance { order_id, filter } => {
            let mut controller = open_orders(backend, session, &filter, page_limit).await?;
            let outcome = controller.advance(session, &order_id).await?;
            print_update(&outcome.order, outcome.email_sent);
        }
        OrdersCmd::SetStatus {
            order_id,
            status,
            filter,
        } => {
            let mut controller = open_orders(backend, session, &filter, page_limit).await?;
            let outcome = controller.transition(session, &order_id, status).await?;
            print_update(&outcome.order, outcome.email_sent);
        }
    }
    Ok(())
}

async fn zones(backend: Arc<HttpBackend>, session: &Session, cmd: ZonesCmd) -> Result<()> {
    let mut controller = ZonesController::new(backend);
    match cmd {
        ZonesCmd::List => {
            controller.load(session).await?;
            let mut table = Table::new(["ID", "Name", "Delivery price", "Description"]);
            for zone in controller.zones() {
                table.row([
                    zone.id.clone(),
                    zone.name.clone(),
                    format_currency(zone.delivery_price),
                    zone.description.clone().unwrap_or_default(),
                ]);
            }
            print!("{table}");
        }
        ZonesCmd::Create {
            name,
            price,
            description,
        } => {
            *controller.draft_mut() = ZoneDraft::new(name, price, description);
            let zone = controller.create(session).await?;
            println!("created zone {} ({})", zone.name, zone.id);
        }
        ZonesCmd::Update {
            zone_id,
            name,
            price,
            description,
        } => {
            controller.load(session).await?;
            controller.begin_edit(&zone_id)?;
            if let Some(edit) = controller.editing_mut() {
                if let Some(name) = name {
                    edit.name = name;
                }
                if let Some(price) = price {
                    edit.delivery_price = price;
                }
                if let Some(description) = description {
                    edit.description = description;
                }
            }
            if let Some(zone) = controller.update(session).await? {
                println!(
                    "updated zone {}: {} at {}",
                    zone.id,
                    zone.name,
                    format_currency(zone.delivery_price)
                );
            }
        }
        ZonesCmd::Delete { zone_id } => {
            controller.delete(session, &zone_id).await?;
            println!("deleted zone {zone_id}");
        }
    }
    Ok(())
}

async fn users(
    backend: Arc<HttpBackend>,
    session: &Session,
    cmd: UsersCmd,
    page_limit: u32,
) -> Result<()> {
    match cmd {
        UsersCmd::List { paging } => {
            let filter = ListFilter::with_limit(paging.limit.unwrap_or(page_limit));
            let mut controller = UsersController::with_filter(backend, filter);
            controller.refresh(session).await?;
            if paging.page != 1 {
                controller.list_mut().go_to_page(session, paging.page).await?;
            }
            let mut table = Table::new(["ID", "Name", "Email", "Status", "Joined"]);
            for user in controller.list().items() {
                table.row([
                    user.id.clone(),
                    user.name.clone(),
                    user.email.clone(),
                    user.status.to_string(),
                    format_optional_date(user.created_at.as_ref()),
                ]);
            }
            print!("{table}");
            print_pagination(controller.list().pagination());
        }
        UsersCmd::Show { user_id } => {
            let mut controller = UsersController::new(backend, page_limit);
            let details = controller.open(session, &user_id).await?;
            println!("{} <{}>", details.user.name, details.user.email);
            println!("status: {}", details.user.status);
            if !details.user.phone.is_empty() {
                println!("phone: {}", details.user.phone);
            }
            println!();
            print_orders(&details.orders);
        }
    }
    Ok(())
}

async fn consumers(
    backend: Arc<HttpBackend>,
    session: &Session,
    cmd: ConsumersCmd,
    page_limit: u32,
) -> Result<()> {
    match cmd {
        ConsumersCmd::List {
            paging,
            status,
            search,
        } => {
            let filter = ListFilter {
                status,
                search: search.filter(|s| !s.trim().is_empty()),
                ..ListFilter::with_limit(paging.limit.unwrap_or(page_limit))
            };
            let mut controller = ConsumersController::with_filter(backend, filter);
            controller.refresh(session).await?;
            if paging.page != 1 {
                controller.list_mut().go_to_page(session, paging.page).await?;
            }
            let mut table = Table::new(["ID", "Name", "Email", "Status", "Last login"]);
            for consumer in controller.list().items() {
                table.row([
                    consumer.id.clone(),
                    consumer.full_name(),
                    consumer.email.clone(),
                    consumer.status.to_string(),
                    format_optional_date(consumer.last_login_at.as_ref()),
                ]);
            }
            print!("{table}");
            print_pagination(controller.list().pagination());
        }
        ConsumersCmd::Stats => {
            let mut controller = ConsumersController::new(backend, page_limit);
            let stats = controller.load_stats(session).await?;
            let mut table = Table::new(["Total", "Active", "Inactive", "Today", "Week", "Month"]);
            table.row([
                stats.total.to_string(),
                stats.active.to_string(),
                stats.inactive.to_string(),
                stats.new_today.to_string(),
                stats.new_this_week.to_string(),
                stats.new_this_month.to_string(),
            ]);
            print!("{table}");
        }
    }
    Ok(())
}

fn print_orders(orders: &[Order]) {
    let mut table = Table::new(["ID", "Tracking", "Status", "Price", "Est. delivery", "Action"]);
    for order in orders {
        table.row([
            order.id.clone(),
            order.tracking_number.clone(),
            order.status.label().to_string(),
            format_currency(order.price),
            format_optional_date(order.estimated_delivery_date.as_ref()),
            next_transition(order.status)
                .map(|t| t.label.to_string())
                .unwrap_or_default(),
        ]);
    }
    if table.is_empty() {
        println!("No orders found");
    } else {
        print!("{table}");
    }
}

fn print_pagination(pagination: &PaginationMeta) {
    match pagination.display_range() {
        Some((first, last)) => println!(
            "Showing {} to {} of {} (page {} of {})",
            first, last, pagination.total, pagination.page, pagination.pages
        ),
        None => println!("No results"),
    }
}

fn print_update(order: &Order, email_sent: bool) {
    let notified = if email_sent {
        "customer notified"
    } else {
        "no notification sent"
    };
    let updated = order
        .updated_at
        .as_ref()
        .map(format_date)
        .map(|d| format!(" on {d}"))
        .unwrap_or_default();
    println!(
        "order {} is now {}{} ({})",
        order.tracking_number,
        order.status.label(),
        updated,
        notified
    );
}
