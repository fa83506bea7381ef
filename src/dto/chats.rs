use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Chat, Message};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateChatRequest {
    pub participant_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PostMessageRequest {
    pub text: String,
    pub image: Option<String>,
    pub video: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ChatList {
    #[schema(value_type = Vec<Chat>)]
    pub items: Vec<Chat>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct MessageList {
    #[schema(value_type = Vec<Message>)]
    pub items: Vec<Message>,
}
