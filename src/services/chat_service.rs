//! Chats and messages are plain storage: rows in, rows out, ordered by
//! created_at. Nothing here delivers or sequences anything.

use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use sea_orm::Set;
use uuid::Uuid;

use crate::{
    dto::chats::{ChatList, CreateChatRequest, MessageList, PostMessageRequest},
    entity::{
        chat_participants::{
            ActiveModel as ParticipantActive, Column as ParticipantCol, Entity as ChatParticipants,
        },
        chats::{ActiveModel as ChatActive, Entity as Chats},
        messages::{ActiveModel as MessageActive, Column as MessageCol, Entity as Messages},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Chat, Message, UserBrief},
    response::{ApiResponse, Meta},
    state::AppState,
};

use chrono::Utc;

pub async fn create_chat(
    state: &AppState,
    user: &AuthUser,
    payload: CreateChatRequest,
) -> AppResult<ApiResponse<Chat>> {
    let mut participant_ids = payload.participant_ids;
    if !participant_ids.contains(&user.user_id) {
        participant_ids.push(user.user_id);
    }
    participant_ids.sort_unstable();
    participant_ids.dedup();

    let users = Users::find()
        .filter(UserCol::Id.is_in(participant_ids.clone()))
        .all(&state.orm)
        .await?;
    if users.len() != participant_ids.len() {
        return Err(AppError::Validation("participant_ids: unknown user".into()));
    }

    let txn = state.orm.begin().await?;
    let chat = ChatActive {
        id: Set(Uuid::new_v4()),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    for participant_id in &participant_ids {
        ParticipantActive {
            chat_id: Set(chat.id),
            user_id: Set(*participant_id),
        }
        .insert(&txn)
        .await?;
    }
    txn.commit().await?;

    let participants = users.iter().map(UserBrief::from_user).collect();

    Ok(ApiResponse::success(
        "Chat created",
        Chat {
            id: chat.id,
            participants,
            created_at: chat.created_at.with_timezone(&Utc),
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_chats(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<ChatList>> {
    let memberships = ChatParticipants::find()
        .filter(ParticipantCol::UserId.eq(user.user_id))
        .all(&state.orm)
        .await?;
    let chat_ids: Vec<Uuid> = memberships.iter().map(|m| m.chat_id).collect();

    let chats = Chats::find()
        .filter(crate::entity::chats::Column::Id.is_in(chat_ids.clone()))
        .all(&state.orm)
        .await?;

    let all_memberships = ChatParticipants::find()
        .filter(ParticipantCol::ChatId.is_in(chat_ids))
        .all(&state.orm)
        .await?;
    let user_ids: Vec<Uuid> = all_memberships.iter().map(|m| m.user_id).collect();
    let briefs: HashMap<Uuid, UserBrief> = Users::find()
        .filter(UserCol::Id.is_in(user_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|u| (u.id, UserBrief::from_user(&u)))
        .collect();

    let mut members_by_chat: HashMap<Uuid, Vec<UserBrief>> = HashMap::new();
    for membership in all_memberships {
        if let Some(brief) = briefs.get(&membership.user_id) {
            members_by_chat
                .entry(membership.chat_id)
                .or_default()
                .push(brief.clone());
        }
    }

    let items = chats
        .into_iter()
        .map(|chat| Chat {
            participants: members_by_chat.remove(&chat.id).unwrap_or_default(),
            id: chat.id,
            created_at: chat.created_at.with_timezone(&Utc),
        })
        .collect();

    Ok(ApiResponse::success("Chats", ChatList { items }, None))
}

pub async fn list_messages(
    state: &AppState,
    user: &AuthUser,
    chat_id: Uuid,
) -> AppResult<ApiResponse<MessageList>> {
    ensure_participant(state, user, chat_id).await?;

    let message_models = Messages::find()
        .filter(MessageCol::ChatId.eq(chat_id))
        .order_by_asc(MessageCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let author_ids: Vec<Uuid> = message_models.iter().map(|m| m.author_id).collect();
    let authors: HashMap<Uuid, UserBrief> = Users::find()
        .filter(UserCol::Id.is_in(author_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|u| (u.id, UserBrief::from_user(&u)))
        .collect();

    let mut items = Vec::with_capacity(message_models.len());
    for message in message_models {
        let author = authors.get(&message.author_id).cloned().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("message {} has no author", message.id))
        })?;
        items.push(Message {
            id: message.id,
            chat_id: message.chat_id,
            author,
            text: message.text,
            image: message.image,
            video: message.video,
            created_at: message.created_at.with_timezone(&Utc),
        });
    }

    Ok(ApiResponse::success("Messages", MessageList { items }, None))
}

pub async fn post_message(
    state: &AppState,
    user: &AuthUser,
    chat_id: Uuid,
    payload: PostMessageRequest,
) -> AppResult<ApiResponse<Message>> {
    ensure_participant(state, user, chat_id).await?;

    if payload.text.trim().is_empty() {
        return Err(AppError::Validation("text: must not be empty".into()));
    }

    let message = MessageActive {
        id: Set(Uuid::new_v4()),
        chat_id: Set(chat_id),
        author_id: Set(user.user_id),
        text: Set(payload.text),
        image: Set(payload.image),
        video: Set(payload.video),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let author = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .map(|u| UserBrief::from_user(&u))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("message author not found")))?;

    Ok(ApiResponse::success(
        "Message sent",
        Message {
            id: message.id,
            chat_id: message.chat_id,
            author,
            text: message.text,
            image: message.image,
            video: message.video,
            created_at: message.created_at.with_timezone(&Utc),
        },
        Some(Meta::empty()),
    ))
}

async fn ensure_participant(state: &AppState, user: &AuthUser, chat_id: Uuid) -> AppResult<()> {
    let chat = Chats::find_by_id(chat_id).one(&state.orm).await?;
    if chat.is_none() {
        return Err(AppError::NotFound);
    }

    let membership = ChatParticipants::find()
        .filter(ParticipantCol::ChatId.eq(chat_id))
        .filter(ParticipantCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    if membership.is_none() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}
