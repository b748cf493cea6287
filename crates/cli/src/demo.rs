//! `querydesk demo`: logs in through the BFF, loads the filter options,
//! runs one search and prints every envelope.

use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use bff::BffService;
use domain::{BffResult, CredentialStore, PriorityLevel, QueryFilter, Timestamp};
use middleware::{ClientInfo, HttpMiddleware, LogRedirect, MemoryCredentialStore};
use services::{AuthService, QueryService};

use crate::config::ClientSettings;

/// Arguments of the `demo` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoArgs {
    pub username: String,
    pub password: String,
    pub filter: QueryFilter,
    pub test_data: Option<i64>,
}

/// Wires the client stack against `settings.base_url`.
pub fn build_bff(settings: &ClientSettings) -> anyhow::Result<BffService> {
    let credentials: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
    let http = HttpMiddleware::builder(settings.base_url.clone())
        .credential_store(credentials.clone())
        .login_redirect(Arc::new(LogRedirect))
        .client_info(ClientInfo {
            url: settings.base_url.clone(),
            ..ClientInfo::default()
        })
        .build()
        .context("failed to build HTTP client")?;

    Ok(BffService::new(
        Arc::new(AuthService::new(http.clone())),
        Arc::new(QueryService::new(http)),
        credentials,
    ))
}

pub async fn run(settings: &ClientSettings, args: &DemoArgs) -> anyhow::Result<()> {
    let bff = build_bff(settings)?;

    let login = bff.login(&args.username, &args.password).await;
    let logged_in = login.is_ok();
    print_outcome("login", login)?;
    if !logged_in {
        anyhow::bail!("login failed for user '{}'", args.username);
    }

    print_outcome("profile", bff.get_user_profile().await)?;
    print_outcome("options", bff.get_query_options().await)?;

    if let Some(num) = args.test_data {
        print_outcome("test-data", bff.post_test_data(num).await)?;
    }

    match bff.get_query_data(&args.filter).await {
        Ok(envelope) => {
            let items = envelope.data.clone().unwrap_or_default();
            print_json("query", &envelope)?;
            for item in &items {
                println!(
                    "  #{:<3} {:<8} priority {} ({})",
                    item.record.id.as_u64(),
                    item.record.name,
                    item.priority,
                    PriorityLevel::from_priority(item.priority)
                );
            }
            print_json("insights", &bff::summarize(&items, Timestamp::now()))?;
        }
        Err(failure) => print_json("query", &failure.into_envelope::<()>())?,
    }

    info!("Demo finished");
    Ok(())
}

fn print_outcome<T: Serialize>(label: &str, outcome: BffResult<T>) -> anyhow::Result<()> {
    match outcome {
        Ok(envelope) => print_json(label, &envelope),
        Err(failure) => print_json(label, &failure.into_envelope::<T>()),
    }
}

fn print_json<T: Serialize>(label: &str, value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("== {label}\n{rendered}");
    Ok(())
}
