use clap::{Parser, Subcommand};
use linkcomercs::core::catalog::{CatalogView, SortOrder};
use linkcomercs::domain::model::{Comercio, Principal};
use linkcomercs::domain::ports::ConfigProvider;
use linkcomercs::utils::logger;
use linkcomercs::{
    AccountService, BusinessService, DirectoryError, DirectoryService, FileSessionStore,
    Overrides, RestComercioStore, RestUserStore, Settings,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

const NO_RESULTS_MESSAGE: &str = "No businesses matched the active filters.";

#[derive(Debug, Parser)]
#[command(name = "linkcomercs")]
#[command(about = "Browse, review and manage local business listings")]
struct Cli {
    #[arg(long, global = true, help = "Override the users collection URL")]
    users_url: Option<String>,

    #[arg(long, global = true, help = "Override the comercio collection URL")]
    comercios_url: Option<String>,

    #[arg(long, global = true, help = "Path of the session file")]
    session_path: Option<String>,

    #[arg(long, global = true, help = "TOML config file")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Per-request timeout in seconds")]
    timeout_secs: Option<u64>,

    #[arg(long, global = true, help = "Enable verbose output")]
    verbose: bool,

    #[arg(long, global = true, help = "Skip confirmation prompts")]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List businesses with filters, sorting and pagination
    List {
        #[arg(long, help = "Exact category")]
        category: Option<String>,
        #[arg(long, help = "City substring, case-insensitive")]
        city: Option<String>,
        #[arg(long)]
        min_score: Option<f64>,
        #[arg(long)]
        max_score: Option<f64>,
        #[arg(long, help = "Free text over email, category and city")]
        search: Option<String>,
        #[arg(long, default_value = "a-z", help = "a-z or z-a")]
        sort: String,
        #[arg(long, default_value = "1")]
        page: usize,
    },
    /// Show one business with its reviews and publications
    Show { id: String },
    /// List the distinct categories of the directory
    Categories,
    /// Log in as an end user
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in as a business
    LoginComercio {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Drop the current session
    Logout,
    /// Show who is currently logged in
    Whoami,
    /// Register a new user account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        user_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        city: String,
        #[arg(long, default_value = "18")]
        age: u32,
    },
    /// Register a new business listing (no login required)
    RegisterComercio {
        #[command(flatten)]
        fields: ComercioFields,
    },
    /// Create a business listing as admin
    AddComercio {
        #[command(flatten)]
        fields: ComercioFields,
    },
    /// Leave a review on a business
    Review {
        id: String,
        #[arg(long)]
        text: String,
        #[arg(long, help = "Score between 0 and 5")]
        score: f64,
    },
    /// Add a publication to your business
    Publish {
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        image: String,
    },
    /// Edit one of your publications by position
    EditPublication {
        id: String,
        index: usize,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        image: String,
    },
    /// Update fields of your user profile
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        user_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        age: Option<u32>,
    },
    /// Delete your user account
    DeleteAccount,
    /// Delete a business listing (owner or admin)
    DeleteComercio { id: String },
}

#[derive(Debug, Clone, clap::Args)]
struct ComercioFields {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    cif: String,
    #[arg(long, default_value = "")]
    country: String,
    #[arg(long)]
    city: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    password: String,
    #[arg(long, default_value = "")]
    image: String,
}

impl From<ComercioFields> for linkcomercs::app::NewComercio {
    fn from(fields: ComercioFields) -> Self {
        Self {
            name: fields.name,
            cif: fields.cif,
            country: fields.country,
            city: fields.city,
            address: fields.address,
            email: fields.email,
            phone: fields.phone,
            category: fields.category,
            password: fields.password,
            image: fields.image,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::error!("command failed: {}", e);
        eprintln!("❌ {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> linkcomercs::Result<()> {
    let overrides = Overrides {
        users_url: cli.users_url.clone(),
        comercios_url: cli.comercios_url.clone(),
        session_path: cli.session_path.clone(),
        timeout_secs: cli.timeout_secs,
        session_ttl_hours: None,
    };
    let settings = Settings::load(overrides, cli.config.as_deref())?;
    tracing::debug!("settings: {:?}", settings);

    let timeout = Duration::from_secs(settings.request_timeout_secs());
    let users = RestUserStore::new(settings.users_endpoint(), timeout)?;
    let comercios = RestComercioStore::new(settings.comercios_endpoint(), timeout)?;
    let sessions = FileSessionStore::new(settings.session_path());

    let directory = DirectoryService::new(comercios.clone());
    let accounts = AccountService::new(
        users,
        comercios.clone(),
        sessions.clone(),
        settings.session_ttl_hours(),
    );
    let business = BusinessService::new(comercios, sessions);

    match cli.command {
        Command::List {
            category,
            city,
            min_score,
            max_score,
            search,
            sort,
            page,
        } => {
            let sort: SortOrder = sort
                .parse()
                .map_err(DirectoryError::validation)?;
            let mut view = CatalogView::new();
            view.set_category(category);
            view.set_city(city);
            view.set_score_range(min_score, max_score);
            view.set_search(search);
            view.set_sort(sort);

            let listing = directory.browse_page(&mut view, page).await?;
            render_listing(&listing);
        }
        Command::Show { id } => {
            let comercio = directory.show(&id).await?;
            render_detail(&comercio);
        }
        Command::Categories => {
            for category in directory.categories().await? {
                println!("{}", category);
            }
        }
        Command::Login { email, password } => {
            let session = accounts.login_user(&email, &password).await?;
            println!("✅ Logged in as {}", session.principal.describe());
        }
        Command::LoginComercio { email, password } => {
            let session = accounts.login_comercio(&email, &password).await?;
            println!("✅ Logged in as {}", session.principal.describe());
        }
        Command::Logout => {
            accounts.logout()?;
            println!("✅ Logged out");
        }
        Command::Whoami => match accounts.current()? {
            Principal::Anonymous => println!("Not logged in."),
            principal => println!("Logged in as {}", principal.describe()),
        },
        Command::Register {
            name,
            user_name,
            email,
            password,
            city,
            age,
        } => {
            let user = accounts
                .register_user(linkcomercs::app::NewUser {
                    name,
                    user_name,
                    email,
                    password,
                    city,
                    age,
                })
                .await?;
            println!("✅ Account {} created (id {})", user.email, user.id);
        }
        Command::RegisterComercio { fields } => {
            let comercio = business.register_comercio(fields.into()).await?;
            println!("✅ Business {} created (id {})", comercio.name, comercio.id);
        }
        Command::AddComercio { fields } => {
            let comercio = business.create_comercio(fields.into()).await?;
            println!("✅ Business {} created (id {})", comercio.name, comercio.id);
        }
        Command::Review { id, text, score } => {
            let comercio = business.submit_review(&id, &text, score).await?;
            println!(
                "✅ Review saved. {} now scores {:.1} over {} reviews",
                comercio.name, comercio.scoring, comercio.nscore
            );
        }
        Command::Publish {
            id,
            title,
            description,
            image,
        } => {
            let today = chrono::Utc::now().date_naive();
            let comercio = business
                .add_publication(&id, &title, &description, &image, today)
                .await?;
            println!(
                "✅ Publication added ({} total)",
                comercio.publications.len()
            );
        }
        Command::EditPublication {
            id,
            index,
            title,
            description,
            image,
        } => {
            business
                .edit_publication(&id, index, &title, &description, &image)
                .await?;
            println!("✅ Publication {} updated", index);
        }
        Command::UpdateProfile {
            name,
            user_name,
            email,
            password,
            city,
            age,
        } => {
            let user = accounts
                .update_profile(linkcomercs::app::ProfileChanges {
                    name,
                    user_name,
                    email,
                    password,
                    city,
                    age,
                })
                .await?;
            println!("✅ Profile updated (version {})", user.version);
        }
        Command::DeleteAccount => {
            if !confirm("Delete your account? This cannot be undone.", cli.yes) {
                println!("Aborted.");
                return Ok(());
            }
            accounts.delete_account().await?;
            println!("✅ Account deleted");
        }
        Command::DeleteComercio { id } => {
            if !confirm(
                "Delete this business listing? This cannot be undone.",
                cli.yes,
            ) {
                println!("Aborted.");
                return Ok(());
            }
            business.delete_comercio(&id).await?;
            println!("✅ Business deleted");
        }
    }

    Ok(())
}

/// Blocking yes/no prompt guarding destructive calls. `--yes` skips it.
fn confirm(prompt: &str, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }
    print!("{} [y/N] ", prompt);
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn render_listing(listing: &linkcomercs::app::Listing) {
    let page = &listing.page;
    if page.is_empty() {
        println!("{}", NO_RESULTS_MESSAGE);
        println!("Total businesses: {}", listing.fetched_total);
        return;
    }

    println!(
        "Page {}/{} ({} matching, {} total)",
        page.number, page.total_pages, page.filtered_total, listing.fetched_total
    );
    println!();
    for comercio in &page.items {
        println!(
            "  {:<24} {:<16} {:<16} ★ {:.1} ({} reviews)",
            comercio.name, comercio.city, comercio.category, comercio.scoring, comercio.nscore
        );
    }
}

fn render_detail(comercio: &Comercio) {
    println!("{}", comercio.name);
    println!("  City:     {}", comercio.city);
    println!("  Category: {}", comercio.category);
    println!("  Email:    {}", comercio.email);
    if !comercio.address.is_empty() {
        println!("  Address:  {}", comercio.address);
    }
    if !comercio.phone.is_empty() {
        println!("  Phone:    {}", comercio.phone);
    }
    println!(
        "  Score:    ★ {:.1} ({} reviews)",
        comercio.scoring, comercio.nscore
    );

    if !comercio.publications.is_empty() {
        println!();
        println!("Publications:");
        for (index, publication) in comercio.publications.iter().enumerate() {
            println!(
                "  [{}] {}: {} ({})",
                index, publication.title, publication.description, publication.date
            );
        }
    }

    if !comercio.reviews.is_empty() {
        println!();
        println!("Reviews:");
        for review in &comercio.reviews {
            println!("  ★ {:.1} {}", review.score, review.text);
        }
    }
}
