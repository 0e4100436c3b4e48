use axum::{extract::Path, Extension, Json};

use crate::{
    authentication::{AuthUser, MaybeUser},
    data_formats::{
        CommentRequest, CommentResponse, CommentWrapper, MultipleCommentsWrapper, SuccessResponse,
    },
    db_helpers::{
        add_comment_to_prayer_in_db, delete_comment_in_db, get_comments_for_prayer_in_db,
        parse_id, update_comment_in_db,
    },
};

use super::{JsonResult, Pool};

type CommentJson = CommentWrapper<CommentResponse>;

const COMMENT_NOT_FOUND: &str = "Comment not found";

pub async fn add_comment(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Pool>,
    Path(prayer_id): Path<String>,
    Json(CommentWrapper { comment }): Json<CommentWrapper<CommentRequest>>,
) -> JsonResult<CommentJson> {
    let AuthUser { id, .. } = maybe_user.require()?;
    let prayer_id = parse_id(&prayer_id, "Prayer not found")?;
    let comment = comment.validate()?;
    let comment = add_comment_to_prayer_in_db(&pool, id, prayer_id, comment).await?;
    Ok(Json(CommentWrapper {
        comment: CommentResponse::new(comment),
    }))
}

pub async fn list_comments(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Pool>,
    Path(prayer_id): Path<String>,
) -> JsonResult<MultipleCommentsWrapper> {
    let prayer_id = parse_id(&prayer_id, "Prayer not found")?;
    let comments = get_comments_for_prayer_in_db(&pool, prayer_id, maybe_user.get_id())
        .await?
        .into_iter()
        .map(CommentResponse::new)
        .collect();
    Ok(Json(MultipleCommentsWrapper { comments }))
}

pub async fn edit_comment(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Pool>,
    Path(comment_id): Path<String>,
    Json(CommentWrapper { comment }): Json<CommentWrapper<CommentRequest>>,
) -> JsonResult<CommentJson> {
    let AuthUser { id, .. } = maybe_user.require()?;
    let comment_id = parse_id(&comment_id, COMMENT_NOT_FOUND)?;
    let comment = comment.validate()?;
    let comment = update_comment_in_db(&pool, id, comment_id, comment).await?;
    Ok(Json(CommentWrapper {
        comment: CommentResponse::new(comment),
    }))
}

pub async fn delete_comment(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Pool>,
    Path(comment_id): Path<String>,
) -> JsonResult<SuccessResponse> {
    let AuthUser { id, .. } = maybe_user.require()?;
    let comment_id = parse_id(&comment_id, COMMENT_NOT_FOUND)?;
    delete_comment_in_db(&pool, id, comment_id).await?;
    Ok(Json(SuccessResponse::ok()))
}
