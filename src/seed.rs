//! Sample users, prayers, comments and reactions for trying the API locally.

use sqlx::{Sqlite, SqlitePool};

use crate::{
    data_formats::{CommentRequest, CreatePrayerRequest},
    db_helpers::{
        add_comment_to_prayer_in_db, create_prayer_in_db, pray_for_prayer_in_db,
        sync_identity_in_db, IdentityProfile,
    },
    errors::RequestError,
};

const SEED_PROVIDER: &str = "seed";

struct SampleUser {
    account: &'static str,
    name: &'static str,
    email: &'static str,
}

struct SamplePrayer {
    author: usize,
    title: &'static str,
    content: &'static str,
    commenter: usize,
    comment: &'static str,
}

const USERS: [SampleUser; 2] = [
    SampleUser {
        account: "joao",
        name: "João Silva",
        email: "joao@example.com",
    },
    SampleUser {
        account: "maria",
        name: "Maria Santos",
        email: "maria@example.com",
    },
];

const PRAYERS: [SamplePrayer; 2] = [
    SamplePrayer {
        author: 0,
        title: "Oração pela família",
        content: "Senhor, abençoe minha família e nos mantenha unidos em seu amor.",
        commenter: 1,
        comment: "Amém! Estou orando junto com você.",
    },
    SamplePrayer {
        author: 1,
        title: "Gratidão pela saúde",
        content: "Agradeço a Deus pela saúde e proteção durante este ano.",
        commenter: 0,
        comment: "Que Deus continue te abençoando!",
    },
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub prayers: usize,
    pub comments: usize,
    pub reactions: usize,
}

/// Inserts the sample data. Users are upserted; authors that already have
/// prayers are left alone, so running it twice adds nothing.
pub async fn seed(pool: &SqlitePool) -> Result<SeedSummary, RequestError> {
    let mut summary = SeedSummary::default();

    let mut user_ids = Vec::with_capacity(USERS.len());
    for user in &USERS {
        let profile = IdentityProfile {
            provider: SEED_PROVIDER.to_string(),
            provider_account_id: user.account.to_string(),
            email: user.email.to_string(),
            name: user.name.to_string(),
            image: Some(format!(
                "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
                user.account
            )),
        };
        user_ids.push(sync_identity_in_db(pool, &profile).await?.id);
        summary.users += 1;
    }

    for sample in &PRAYERS {
        let author_id = user_ids[sample.author];
        let existing = sqlx::query_scalar::<Sqlite, i64>(
            r#"SELECT COUNT(*) FROM prayers WHERE author_id = $1"#,
        )
        .bind(author_id)
        .fetch_one(pool)
        .await?;
        if existing > 0 {
            tracing::debug!(%author_id, "author already has prayers, skipping");
            continue;
        }

        let request = CreatePrayerRequest {
            title: sample.title.to_string(),
            content: sample.content.to_string(),
            is_anonymous: false,
        }
        .validate()?;
        let prayer = create_prayer_in_db(pool, author_id, request).await?;
        summary.prayers += 1;

        let commenter_id = user_ids[sample.commenter];
        let comment = CommentRequest {
            content: sample.comment.to_string(),
        }
        .validate()?;
        add_comment_to_prayer_in_db(pool, commenter_id, prayer.id, comment).await?;
        summary.comments += 1;

        pray_for_prayer_in_db(pool, commenter_id, prayer.id).await?;
        summary.reactions += 1;
    }

    tracing::info!(?summary, "seeded sample data");
    Ok(summary)
}
