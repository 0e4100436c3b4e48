use axum::{
    extract::{Path, Query},
    Extension, Json,
};

use crate::{
    authentication::{AuthUser, MaybeUser},
    data_formats::{
        AnswerPrayerRequest, CreatePrayerRequest, FeedQueryParams, IntercessorResponse,
        IntercessorsWrapper, MultiplePrayersWrapper, PrayerResponse, PrayerWrapper,
        SuccessResponse,
    },
    db_helpers::{
        answer_prayer_in_db, create_prayer_in_db, get_prayer_by_id_in_db, hide_prayer_in_db,
        list_intercessors_in_db, list_prayers_in_db, parse_id, pray_for_prayer_in_db,
    },
    errors::RequestError,
};

use super::{single_with_comments, with_comments, JsonResult, Pool};

type PrayerJson = PrayerWrapper<PrayerResponse>;

const PRAYER_NOT_FOUND: &str = "Prayer not found";

// ----------------- Feed Handlers -----------------
pub async fn list_prayers(
    Extension(pool): Extension<Pool>,
    maybe_user: MaybeUser,
    params: Option<Query<FeedQueryParams>>,
) -> JsonResult<MultiplePrayersWrapper> {
    let params = params.map(|Query(params)| params).unwrap_or_default();
    let viewer = maybe_user.get_id();
    let (prayers, total) = list_prayers_in_db(&pool, viewer, params).await?;
    let prayers = with_comments(&pool, prayers, viewer).await?;
    Ok(Json(MultiplePrayersWrapper {
        prayers,
        prayers_count: total,
        page: params.page(),
        total_pages: params.total_pages(total),
    }))
}

pub async fn create_prayer(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Pool>,
    Json(PrayerWrapper { prayer }): Json<PrayerWrapper<CreatePrayerRequest>>,
) -> JsonResult<PrayerJson> {
    let AuthUser { id, .. } = maybe_user.require()?;
    let prayer = prayer.validate()?;
    let prayer = create_prayer_in_db(&pool, id, prayer).await?;
    tracing::info!(prayer_id = %prayer.id, author_id = %id, "prayer created");
    Ok(Json(PrayerWrapper {
        prayer: PrayerResponse::new(prayer, vec![], Some(id)),
    }))
}

pub async fn get_prayer(
    Extension(pool): Extension<Pool>,
    maybe_user: MaybeUser,
    Path(id): Path<String>,
) -> JsonResult<PrayerJson> {
    let id = parse_id(&id, PRAYER_NOT_FOUND)?;
    let viewer = maybe_user.get_id();
    let prayer = get_prayer_by_id_in_db(&pool, id, viewer)
        .await?
        .ok_or(RequestError::NotFound(PRAYER_NOT_FOUND))?;
    Ok(Json(PrayerWrapper {
        prayer: single_with_comments(&pool, prayer, viewer).await?,
    }))
}

// ----------------- Reaction Handlers -----------------
pub async fn pray_for_prayer(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Pool>,
    Path(id): Path<String>,
) -> JsonResult<PrayerJson> {
    let AuthUser { id: user_id, .. } = maybe_user.require()?;
    let id = parse_id(&id, PRAYER_NOT_FOUND)?;
    let prayer = pray_for_prayer_in_db(&pool, user_id, id).await?;
    Ok(Json(PrayerWrapper {
        prayer: single_with_comments(&pool, prayer, Some(user_id)).await?,
    }))
}

pub async fn list_intercessors(
    Extension(pool): Extension<Pool>,
    Path(id): Path<String>,
) -> JsonResult<IntercessorsWrapper> {
    let id = parse_id(&id, PRAYER_NOT_FOUND)?;
    let prayed_by = list_intercessors_in_db(&pool, id)
        .await?
        .into_iter()
        .map(IntercessorResponse::from)
        .collect();
    Ok(Json(IntercessorsWrapper { prayed_by }))
}

// ----------------- Author Handlers -----------------
pub async fn hide_prayer(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Pool>,
    Path(id): Path<String>,
) -> JsonResult<SuccessResponse> {
    let AuthUser { id: user_id, .. } = maybe_user.require()?;
    let id = parse_id(&id, PRAYER_NOT_FOUND)?;
    hide_prayer_in_db(&pool, user_id, id).await?;
    Ok(Json(SuccessResponse::ok()))
}

pub async fn answer_prayer(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Pool>,
    Path(id): Path<String>,
    request: Option<Json<PrayerWrapper<AnswerPrayerRequest>>>,
) -> JsonResult<PrayerJson> {
    let AuthUser { id: user_id, .. } = maybe_user.require()?;
    let id = parse_id(&id, PRAYER_NOT_FOUND)?;
    let status_message = request.and_then(|Json(PrayerWrapper { prayer })| prayer.status_message);
    let prayer = answer_prayer_in_db(&pool, user_id, id, status_message).await?;
    Ok(Json(PrayerWrapper {
        prayer: single_with_comments(&pool, prayer, Some(user_id)).await?,
    }))
}
