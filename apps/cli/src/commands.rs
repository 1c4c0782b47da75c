use std::time::Duration;

use anyhow::{bail, Result};
use tokio::task::JoinHandle;
use tracing::debug;

use propconnect_client::{InquiryStatus, PrincipalKind, Property, PropertyQuery};
use propconnect_runtime::{shutdown_signal, AppContext};
use propconnect_store::{
    DashboardCounters, NotificationPreferences, Principal, RegistrationOutcome, Severity, Store,
};
use propconnect_views::{
    ContactForm, FeaturedListingsAdmin, InquiriesView, LoginForm, PropertyDetailView,
    RegistrationForm, ViewError,
};

use crate::{Commands, FavoritesAction, FeaturedAction, PreferencesAction, PropertyAction};

const BACKGROUND_GRACE: Duration = Duration::from_secs(2);

pub async fn run(context: &AppContext, command: Commands) -> Result<()> {
    let store = &context.store;
    match command {
        Commands::Login { kind, email, password } => {
            let principal = LoginForm::new(kind, email, password)
                .submit(store)
                .await
                .map_err(report)?;
            println!("Signed in as {}", describe(&principal));
        }
        Commands::Register {
            kind,
            email,
            password,
            first_name,
            last_name,
            phone,
            license_number,
            brokerage,
            years_experience,
        } => {
            let form = RegistrationForm {
                email,
                confirm_password: password.clone(),
                password,
                first_name,
                last_name,
                phone: phone.unwrap_or_default(),
                license_number: license_number.unwrap_or_default(),
                brokerage: brokerage.unwrap_or_default(),
                years_experience,
                ..RegistrationForm::new(kind)
            };
            match form.submit(store).await.map_err(report)? {
                RegistrationOutcome::SignedIn(principal) => {
                    println!("Signed in as {}", describe(&principal));
                }
                RegistrationOutcome::PendingApproval { .. } => {
                    println!("Agent account awaiting approval");
                }
            }
        }
        Commands::Logout => {
            let notify = store.logout();
            println!("Signed out");
            settle("logout", notify).await;
        }
        Commands::Whoami => {
            let auth = store.auth();
            println!("{}", describe(&auth.principal));
        }
        Commands::Favorites { action } => favorites(store, action).await?,
        Commands::Preferences { action } => preferences(store, action).await?,
        Commands::Property {
            action: PropertyAction::Show { property_id },
        } => {
            let mut view = PropertyDetailView::load(store, &property_id)
                .await
                .map_err(report)?;
            print_property(view.property());
            for photo in view.gallery() {
                let marker = if photo.is_primary { "*" } else { " " };
                println!("  {marker} {}", photo.url);
            }
            if view.is_favorite() {
                println!("  saved to favorites");
            }
            settle("view tracking", view.take_view_tracking()).await;
        }
        Commands::Search {
            query,
            city,
            state,
            min_price,
            max_price,
            bedrooms,
            property_type,
            listing_type,
            page,
        } => {
            let filters = PropertyQuery {
                search: query,
                city,
                state,
                min_price,
                max_price,
                bedrooms,
                property_type,
                listing_type,
                page,
                ..PropertyQuery::default()
            };
            let results = store.client().search_properties(&filters).await?;
            for property in &results.properties {
                print_property(property);
            }
            println!(
                "page {} of {} ({} listings)",
                results.page.max(1),
                results.total_pages.max(1),
                results.total
            );
        }
        Commands::Inquiries { status, open, reply } => {
            inquiries(store, status, open, reply).await?;
        }
        Commands::Contact {
            property_id,
            name,
            email,
            phone,
            message,
        } => {
            let mut form = ContactForm::for_store(property_id, store);
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(email) = email {
                form.email = email;
            }
            if let Some(phone) = phone {
                form.phone = phone;
            }
            form.message = message;
            form.submit(store).await.map_err(report)?;
        }
        Commands::Featured { action } => featured(store, action).await?,
        Commands::Dashboard { watch } => dashboard(context, watch).await?,
    }
    Ok(())
}

async fn favorites(store: &Store, action: FavoritesAction) -> Result<()> {
    match action {
        FavoritesAction::List => {
            let favorites = store.load_favorites().await?;
            if favorites.is_empty() {
                println!("No saved listings");
            }
            for property_id in favorites {
                println!("{property_id}");
            }
        }
        FavoritesAction::Add { property_id } => store.add_favorite(&property_id).await?,
        FavoritesAction::Remove { property_id } => store.remove_favorite(&property_id).await?,
    }
    Ok(())
}

async fn preferences(store: &Store, action: PreferencesAction) -> Result<()> {
    let current = store.load_notification_preferences().await?;
    match action {
        PreferencesAction::Show => match current {
            Some(NotificationPreferences::User(preferences)) => println!("{preferences:#?}"),
            Some(NotificationPreferences::Agent(preferences)) => println!("{preferences:#?}"),
            None => println!("No notification preferences for this account"),
        },
        PreferencesAction::SetFrequency { frequency } => match current {
            Some(NotificationPreferences::User(mut preferences)) => {
                preferences.frequency = frequency;
                store.update_user_notification_preferences(preferences).await?;
            }
            Some(NotificationPreferences::Agent(mut preferences)) => {
                preferences.frequency = frequency;
                store.update_agent_notification_preferences(preferences).await?;
            }
            None => bail!("this account has no notification preferences"),
        },
    }
    Ok(())
}

async fn inquiries(
    store: &Store,
    status: Option<InquiryStatus>,
    open: Option<String>,
    reply: Option<String>,
) -> Result<()> {
    let mut view = InquiriesView::new(store).map_err(report)?;

    let Some(inquiry_id) = open else {
        let inquiries = view.load(status).await.map_err(report)?;
        for inquiry in &inquiries {
            println!(
                "{:<10} {:<8} {} <{}>: {}",
                inquiry.id,
                inquiry.status.as_str(),
                inquiry.name,
                inquiry.email,
                inquiry.property_title.as_deref().unwrap_or(&inquiry.property_id)
            );
        }
        return Ok(());
    };

    let thread = view.open(&inquiry_id).await.map_err(report)?;
    println!("{} <{}>", thread.inquiry.name, thread.inquiry.email);
    println!("{}", thread.inquiry.message);
    for reply in &thread.replies {
        println!("  > {}", reply.message);
    }

    if let Some(message) = reply {
        view.reply(&inquiry_id, &message).await.map_err(report)?;
    }
    Ok(())
}

async fn featured(store: &Store, action: FeaturedAction) -> Result<()> {
    let admin = FeaturedListingsAdmin::new(store).map_err(report)?;
    match action {
        FeaturedAction::List => {
            for listing in admin.load().await.map_err(report)? {
                let title = listing
                    .property
                    .as_ref()
                    .map(|property| property.title.as_str())
                    .unwrap_or(listing.property_id.as_str());
                println!("{:>2}. {} ({})", listing.position, title, listing.id);
            }
        }
        FeaturedAction::Add { property_id } => {
            admin.add(&property_id).await.map_err(report)?;
        }
        FeaturedAction::Remove { featured_id } => {
            admin.remove(&featured_id).await.map_err(report)?;
        }
        FeaturedAction::Move { from, to } => {
            admin.load().await.map_err(report)?;
            let index = |position: usize| position.checked_sub(1).unwrap_or(usize::MAX);
            admin
                .move_item(index(from), index(to))
                .await
                .map_err(report)?;
        }
    }
    Ok(())
}

async fn dashboard(context: &AppContext, watch: bool) -> Result<()> {
    let store = &context.store;
    if !store.auth().is_agent_authenticated() {
        bail!("sign in as an agent to view the dashboard");
    }
    print_counters(&store.load_dashboard_stats().await?);
    if !watch {
        return Ok(());
    }

    let Some(refresh) = context.spawn_dashboard_refresh() else {
        bail!("dashboard refresh is disabled; set dashboard.refresh_interval_seconds");
    };
    let mut updates = store.subscribe();
    let mut last = store.dashboard();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let counters = updates.borrow_and_update().dashboard;
                if counters != last {
                    print_counters(&counters);
                    last = counters;
                }
            }
        }
    }
    refresh.abort();
    Ok(())
}

/// Give a background request a moment to finish before the runtime shuts down.
async fn settle(what: &str, task: Option<JoinHandle<()>>) {
    let Some(task) = task else {
        return;
    };
    match tokio::time::timeout(BACKGROUND_GRACE, task).await {
        Ok(Ok(())) => {}
        Ok(Err(error)) => debug!(what, error = %error, "background task failed"),
        Err(_) => debug!(what, "background task still running at exit"),
    }
}

/// Surface whatever toasts the command produced.
pub fn print_toasts(store: &Store) {
    for toast in store.toasts() {
        let label = match toast.severity {
            Severity::Success => "ok",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        eprintln!("[{label}] {}", toast.message);
    }
}

/// Print field errors one per line and turn the view error into an anyhow error.
fn report(error: ViewError) -> anyhow::Error {
    if let Some(fields) = error.field_errors() {
        for (field, message) in fields.iter() {
            eprintln!("  {field}: {message}");
        }
    }
    anyhow::anyhow!(error.user_message())
}

fn describe(principal: &Principal) -> String {
    match principal.kind() {
        None => "guest".to_string(),
        Some(kind) => {
            let name = principal.display_name().unwrap_or_default();
            let kind = match kind {
                PrincipalKind::User => "property seeker",
                PrincipalKind::Agent => "agent",
                PrincipalKind::Admin => "admin",
            };
            format!("{name} ({kind})")
        }
    }
}

fn print_property(property: &Property) {
    println!(
        "{:<10} ${:>12.0}  {} bd / {} ba  {}  {}",
        property.id,
        property.price,
        property.bedrooms,
        property.bathrooms,
        property.title,
        property.full_address()
    );
}

fn print_counters(counters: &DashboardCounters) {
    println!(
        "unread inquiries: {}  active listings: {}  views: {}  inquiries: {}",
        counters.unread_inquiry_count,
        counters.total_active_listings,
        counters.total_views,
        counters.total_inquiries
    );
}
