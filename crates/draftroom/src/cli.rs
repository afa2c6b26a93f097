//! Command-line surface over [`DraftAccess`].
//!
//! The acting user comes from `--user`/`--admin` and is registered with the
//! identity resolver under [`CLI_TOKEN`]. Mutations are authorized against
//! the draft's commissioner and the trusted listings require the admin role.
//! Everything printed is a [`DraftView`](draftroom_core::draft::DraftView)
//! unless the caller is an admin.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use draftroom_core::cache::Cache;
use draftroom_core::draft::{DepthChartSlot, DraftId, DraftSettings, DraftStatus, NextPick, UserId};
use draftroom_core::identity::{Identity, TokenIdentityResolver, ROLE_ADMIN};
use draftroom_core::reference::StaticReferenceData;
use draftroom_core::storage::{DepthChartRepository, DraftRepository};

use crate::storage::CachedDraftRepository;
use crate::{Config, DraftAccess};

/// Token under which the command-line caller's identity is registered.
pub const CLI_TOKEN: &str = "cli";

#[derive(Debug, Parser)]
#[command(name = "draftroom")]
#[command(version, about = "Manage fantasy drafts", long_about = None)]
pub struct Cli {
    /// Path to the SQLite database
    #[arg(long, global = true, env = "SQLITE_PATH")]
    pub db: Option<String>,

    /// Act as this user id; anonymous when omitted
    #[arg(long, global = true, env = "DRAFTROOM_USER")]
    pub user: Option<i64>,

    /// Grant the acting user the admin role
    #[arg(long, global = true, requires = "user")]
    pub admin: bool,

    /// Draft password used to unlock protected drafts
    #[arg(long, global = true, env = "DRAFTROOM_PASSWORD")]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new draft owned by the acting user
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        sport: String,
        #[arg(long, default_value = "serpentine")]
        style: String,
        #[arg(long, default_value_t = 15)]
        rounds: i64,
        /// Password protecting the new draft
        #[arg(long)]
        draft_password: Option<String>,
        #[arg(long)]
        depth_charts: bool,
    },
    /// Show a draft as the acting user may see it
    Show {
        id: i64,
        /// Attach reference lookups (sports, styles, teams, positions)
        #[arg(long)]
        lookups: bool,
    },
    /// Print the raw stored draft (admin only)
    Raw {
        id: i64,
        /// Skip the cache and re-read from the store
        #[arg(long)]
        bust_cache: bool,
    },
    /// List drafts, newest first
    List {
        /// Only drafts owned by this commissioner
        #[arg(long)]
        commish: Option<i64>,
        /// Admin listing of completed drafts
        #[arg(long, conflicts_with = "commish")]
        completed: bool,
        /// Admin listing (passwords included) instead of public views
        #[arg(long, requires = "commish")]
        all: bool,
    },
    /// Edit a draft's settings; omitted fields keep their values
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        sport: Option<String>,
        #[arg(long)]
        style: Option<String>,
        #[arg(long)]
        rounds: Option<i64>,
        #[arg(long)]
        commish: Option<i64>,
        /// New password; an empty string removes it
        #[arg(long)]
        draft_password: Option<String>,
        #[arg(long)]
        depth_charts: Option<bool>,
    },
    /// Set a draft's status (setting_up, in_progress, complete)
    Status { id: i64, status: DraftStatus },
    /// Start the draft at round 1, pick 1
    Start { id: i64 },
    /// Move to the next pick, or complete the draft when none is given
    Advance {
        id: i64,
        #[arg(long, requires = "pick")]
        round: Option<i64>,
        #[arg(long, requires = "round")]
        pick: Option<i64>,
    },
    /// Complete the draft and stamp its end time
    Finish { id: i64 },
    /// Increment the pick counter and print the new value
    Counter { id: i64 },
    /// Stamp the draft's statistics generation time
    Stats { id: i64 },
    /// Replace the depth-chart layout, e.g. `QB:1 RB:2 WR:3`
    DepthChart {
        id: i64,
        #[arg(value_parser = parse_slot)]
        slots: Vec<DepthChartSlot>,
    },
    /// Delete a draft
    Delete { id: i64 },
}

pub fn parse_slot(value: &str) -> Result<DepthChartSlot, String> {
    let (position, slots) = value
        .split_once(':')
        .ok_or_else(|| format!("expected POSITION:SLOTS, got '{value}'"))?;
    let slots = slots
        .parse()
        .map_err(|_| format!("invalid slot count in '{value}'"))?;
    Ok(DepthChartSlot::new(position.trim(), slots))
}

impl Cli {
    /// The acting user, if any.
    pub fn identity(&self) -> Option<Identity> {
        self.user.map(|id| {
            let identity = Identity::new(UserId(id));
            if self.admin {
                identity.with_role(ROLE_ADMIN)
            } else {
                identity
            }
        })
    }

    /// Resolver that knows the acting user under [`CLI_TOKEN`].
    pub fn resolver(&self) -> TokenIdentityResolver {
        match self.identity() {
            Some(identity) => TokenIdentityResolver::new().with_token(CLI_TOKEN, identity),
            None => TokenIdentityResolver::new(),
        }
    }

    fn token(&self) -> Option<&'static str> {
        self.user.map(|_| CLI_TOKEN)
    }
}

/// Wires the facade over a repository and cache.
pub fn build_access<R, C>(
    repository: Arc<R>,
    cache: Arc<C>,
    resolver: TokenIdentityResolver,
    config: &Config,
) -> DraftAccess<R, C>
where
    R: DraftRepository + DepthChartRepository + 'static,
    C: Cache + 'static,
{
    let depth_charts: Arc<dyn DepthChartRepository> = repository.clone();
    DraftAccess::new(
        CachedDraftRepository::new(repository, cache, config.cache_ttl()),
        Arc::new(resolver),
        Arc::new(config.user_directory()),
        Arc::new(config.time_display()),
        Arc::new(StaticReferenceData::standard()),
        depth_charts,
    )
}

/// Runs one command and returns what should be printed.
///
/// `Value::Null` means there is nothing to print.
pub async fn execute<R, C>(cli: Cli, access: &DraftAccess<R, C>) -> anyhow::Result<Value>
where
    R: DraftRepository + 'static,
    C: Cache + 'static,
{
    let token = cli.token();
    let password = cli.password.as_deref();

    // Mutations: check ownership, write, then print what the caller may see.
    let view = |id: DraftId| async move {
        let view = access.get_public_draft(token, id, false, password).await?;
        anyhow::Ok(serde_json::to_value(view)?)
    };

    match cli.command {
        Command::Create {
            name,
            sport,
            style,
            rounds,
            draft_password,
            depth_charts,
        } => {
            let commish = cli
                .user
                .map(UserId)
                .context("--user is required to create a draft")?;
            let mut settings = DraftSettings::new(commish, name, sport, style, rounds)
                .with_depth_charts(depth_charts);
            if let Some(p) = draft_password {
                settings = settings.with_password(p);
            }
            let draft = access.create_draft(settings).await?;
            tracing::info!(draft_id = %draft.id, "Created draft");
            view(draft.id).await
        }
        Command::Show { id, lookups } => {
            let view = access
                .get_public_draft(token, DraftId(id), lookups, password)
                .await?;
            Ok(serde_json::to_value(view)?)
        }
        Command::Raw { id, bust_cache } => {
            access.require_admin(token)?;
            Ok(serde_json::to_value(access.load(DraftId(id), bust_cache).await?)?)
        }
        Command::List {
            commish,
            completed,
            all,
        } => {
            let listing = match (commish, completed, all) {
                (_, true, _) => {
                    access.require_admin(token)?;
                    serde_json::to_value(access.get_all_completed_drafts().await?)?
                }
                (Some(c), _, true) => {
                    access.require_admin(token)?;
                    serde_json::to_value(access.get_all_drafts_by_commish(UserId(c)).await?)?
                }
                (Some(c), _, false) => serde_json::to_value(
                    access
                        .get_public_drafts_by_commish(token, UserId(c), password)
                        .await?,
                )?,
                (None, _, _) => {
                    serde_json::to_value(access.get_public_drafts(token, password).await?)?
                }
            };
            Ok(listing)
        }
        Command::Update {
            id,
            name,
            sport,
            style,
            rounds,
            commish,
            draft_password,
            depth_charts,
        } => {
            let id = DraftId(id);
            let mut settings = access.authorize(token, id).await?.settings();
            if let Some(name) = name {
                settings.name = name;
            }
            if let Some(sport) = sport {
                settings.sport = sport;
            }
            if let Some(style) = style {
                settings.style = style;
            }
            if let Some(rounds) = rounds {
                settings.rounds = rounds;
            }
            if let Some(commish) = commish {
                settings.commish_id = UserId(commish);
            }
            if let Some(p) = draft_password {
                settings.password = Some(p);
            }
            if let Some(enabled) = depth_charts {
                settings.using_depth_charts = enabled;
            }
            access.update_draft(id, settings).await?;
            view(id).await
        }
        Command::Status { id, status } => {
            let id = DraftId(id);
            access.authorize(token, id).await?;
            access.update_status(id, status).await?;
            view(id).await
        }
        Command::Start { id } => {
            let id = DraftId(id);
            access.authorize(token, id).await?;
            access.set_draft_in_progress(id).await?;
            view(id).await
        }
        Command::Advance { id, round, pick } => {
            let id = DraftId(id);
            let next = round.zip(pick).map(|(r, p)| NextPick::new(r, p));
            access.authorize(token, id).await?;
            access.move_draft_forward(id, next).await?;
            view(id).await
        }
        Command::Finish { id } => {
            let id = DraftId(id);
            access.authorize(token, id).await?;
            access.move_draft_forward(id, None).await?;
            view(id).await
        }
        Command::Counter { id } => {
            let id = DraftId(id);
            access.authorize(token, id).await?;
            let counter = access.increment_draft_counter(id).await?;
            Ok(json!({ "id": id, "counter": counter }))
        }
        Command::Stats { id } => {
            let id = DraftId(id);
            access.authorize(token, id).await?;
            access.update_stats_timestamp(id).await?;
            view(id).await
        }
        Command::DepthChart { id, slots } => {
            let id = DraftId(id);
            access.authorize(token, id).await?;
            Ok(serde_json::to_value(
                access.set_depth_chart_positions(id, &slots).await?,
            )?)
        }
        Command::Delete { id } => {
            access.authorize(token, DraftId(id)).await?;
            access.delete_draft(DraftId(id)).await?;
            tracing::info!(draft_id = id, "Deleted draft");
            Ok(Value::Null)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::cache::MemoryCache;
    use crate::storage::InMemoryRepository;
    use crate::AccessError;

    type Access = DraftAccess<InMemoryRepository, MemoryCache>;

    fn parse(args: &[&str]) -> Cli {
        let argv = std::iter::once("draftroom").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap()
    }

    fn config() -> Config {
        Config::from_lookup(|key| match key {
            "COMMISH_NAMES" => Some("1=Jordan".to_string()),
            _ => None,
        })
    }

    /// Runs `args` against a shared store, with the resolver built from them.
    async fn run(repo: &Arc<InMemoryRepository>, args: &[&str]) -> anyhow::Result<Value> {
        let cli = parse(args);
        let cache = Arc::new(MemoryCache::new(100));
        let access: Access = build_access(repo.clone(), cache, cli.resolver(), &config());
        execute(cli, &access).await
    }

    fn access_error(err: anyhow::Error) -> AccessError {
        err.downcast::<AccessError>().unwrap()
    }

    async fn seed(repo: &Arc<InMemoryRepository>) -> i64 {
        let created = run(
            repo,
            &[
                "--user", "1", "create", "--name", "Alpha", "--sport", "football",
                "--draft-password", "secret",
            ],
        )
        .await
        .unwrap();
        created["id"].as_i64().unwrap()
    }

    #[test]
    fn test_parse_slot() {
        let slot = parse_slot("QB:2").unwrap();
        assert_eq!((slot.position.as_str(), slot.slots), ("QB", 2));
        assert!(parse_slot("QB").is_err());
        assert!(parse_slot("QB:x").is_err());
    }

    #[test]
    fn test_admin_requires_user() {
        let argv = ["draftroom", "--admin", "list"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[tokio::test]
    async fn test_create_prints_view_without_password() {
        let repo = Arc::new(InMemoryRepository::new());
        let id = seed(&repo).await;

        let id_arg = id.to_string();
        let shown = run(&repo, &["--user", "1", "show", &id_arg])
            .await
            .unwrap();
        assert_eq!(shown["commish_editable"], true);
        assert_eq!(shown["commish_name"], "Jordan");
        assert!(shown.get("password").is_none());
        assert!(!shown.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_create_requires_user() {
        let repo = Arc::new(InMemoryRepository::new());
        let err = run(&repo, &["create", "--name", "Alpha", "--sport", "football"])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("--user"));
    }

    #[tokio::test]
    async fn test_stranger_cannot_update_or_delete() {
        let repo = Arc::new(InMemoryRepository::new());
        let id = seed(&repo).await;
        let id_arg = id.to_string();
        let id_arg = id_arg.as_str();

        for args in [
            vec!["--user", "3", "update", id_arg, "--name", "Hijacked"],
            vec!["--user", "3", "update", id_arg, "--draft-password", ""],
            vec!["--user", "3", "delete", id_arg],
            vec!["--user", "3", "counter", id_arg],
            vec!["update", id_arg, "--name", "Anonymous"],
        ] {
            let err = run(&repo, &args).await.unwrap_err();
            assert_eq!(access_error(err), AccessError::Forbidden(DraftId(id)), "{args:?}");
        }

        let stored = repo.get_draft(DraftId(id)).await.unwrap().unwrap();
        assert_eq!(stored.name, "Alpha");
        assert_eq!(stored.password.as_deref(), Some("secret"));
        assert_eq!(stored.counter, 0);
    }

    #[tokio::test]
    async fn test_owner_and_admin_may_mutate() {
        let repo = Arc::new(InMemoryRepository::new());
        let id = seed(&repo).await;
        let id_arg = id.to_string();
        let id_arg = id_arg.as_str();

        let updated = run(&repo, &["--user", "1", "update", id_arg, "--rounds", "12"])
            .await
            .unwrap();
        assert_eq!(updated["rounds"], 12);
        assert!(updated.get("password").is_none());

        let counted = run(&repo, &["--user", "2", "--admin", "counter", id_arg])
            .await
            .unwrap();
        assert_eq!(counted["counter"], 1);

        let deleted = run(&repo, &["--user", "2", "--admin", "delete", id_arg])
            .await
            .unwrap();
        assert_eq!(deleted, Value::Null);
        assert!(repo.get_draft(DraftId(id)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_trusted_reads_require_admin() {
        let repo = Arc::new(InMemoryRepository::new());
        let id = seed(&repo).await;
        let id_arg = id.to_string();
        let id_arg = id_arg.as_str();

        for args in [
            vec!["raw", id_arg],
            vec!["--user", "1", "raw", id_arg],
            vec!["list", "--completed"],
            vec!["--user", "3", "list", "--commish", "1", "--all"],
        ] {
            let err = run(&repo, &args).await.unwrap_err();
            assert_eq!(access_error(err), AccessError::AdminRequired, "{args:?}");
        }

        let raw = run(&repo, &["--user", "2", "--admin", "raw", id_arg])
            .await
            .unwrap();
        assert_eq!(raw["password"], "secret");

        let all = run(&repo, &["--user", "2", "--admin", "list", "--commish", "1", "--all"])
            .await
            .unwrap();
        assert_eq!(all[0]["password"], "secret");
    }

    #[tokio::test]
    async fn test_public_listing_locks_protected_drafts() {
        let repo = Arc::new(InMemoryRepository::new());
        seed(&repo).await;

        let listing = run(&repo, &["list"]).await.unwrap();
        assert_eq!(listing[0]["status"], "locked");
        assert_eq!(listing[0]["commish_name"], "Jordan");
        assert!(!listing.to_string().contains("secret"));
    }
}
