//! Request and response records for the customer service API
//!
//! Field names are the exact snake_case keys on the wire.

use serde::{Deserialize, Serialize};

// =============================================================================
// Agent Directory (客服帐号)
// =============================================================================

/// All configured agents (`getkflist`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KfListResponse {
    pub kf_list: Vec<AgentSummary>,
}

/// A single configured agent
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentSummary {
    /// Full account, e.g. `test1@gh_xxx`
    pub kf_account: String,
    #[serde(default)]
    pub kf_headimgurl: String,
    #[serde(default)]
    pub kf_id: String,
    #[serde(default)]
    pub kf_nick: String,
    /// Bound personal WeChat id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kf_wx: Option<String>,
    /// Pending invitation target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_wx: Option<String>,
    /// Unix seconds at which the pending invitation lapses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_expire_time: Option<i64>,
    /// `waiting`, `rejected` or `expired`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_status: Option<String>,
}

/// Agents currently online (`getonlinekflist`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KfOnlineListResponse {
    pub kf_online_list: Vec<AgentOnlineStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentOnlineStatus {
    pub kf_account: String,
    /// Online status bitmask reported by the service
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub kf_id: String,
    /// Sessions the agent is currently handling
    #[serde(default)]
    pub accepted_case: i64,
}

/// Body for both `kfaccount/add` and `kfaccount/update`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentCreateOrUpdateRequest {
    pub kf_account: String,
    pub nickname: String,
}

impl AgentCreateOrUpdateRequest {
    pub fn new(kf_account: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            kf_account: kf_account.into(),
            nickname: nickname.into(),
        }
    }
}

/// Invite a personal WeChat id to bind an agent account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentInviteRequest {
    pub kf_account: String,
    pub invite_wx: String,
}

impl AgentInviteRequest {
    pub fn new(kf_account: impl Into<String>, invite_wx: impl Into<String>) -> Self {
        Self {
            kf_account: kf_account.into(),
            invite_wx: invite_wx.into(),
        }
    }
}

/// Avatar upload; `kf_account` travels in the query string, `media` as multipart
///
/// `kf_account` is sent unescaped and must already be a valid `name@gh_xxx`
/// account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentAvatarUploadRequest {
    pub kf_account: String,
    /// Base64 (standard alphabet) encoded image bytes
    pub media: String,
}

impl AgentAvatarUploadRequest {
    pub fn new(kf_account: impl Into<String>, media: impl Into<String>) -> Self {
        Self {
            kf_account: kf_account.into(),
            media: media.into(),
        }
    }
}

/// Account deletion; `kf_account` is sent unescaped in the query string and
/// must already be a valid `name@gh_xxx` account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentDeleteRequest {
    pub kf_account: String,
}

impl AgentDeleteRequest {
    pub fn new(kf_account: impl Into<String>) -> Self {
        Self {
            kf_account: kf_account.into(),
        }
    }
}

// =============================================================================
// Chat Transcripts (聊天记录)
// =============================================================================

/// Query for `msgrecord/getmsglist`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptQuery {
    /// Window start, unix seconds
    pub starttime: i64,
    /// Window end, unix seconds
    pub endtime: i64,
    /// First message id to return; 1 starts from the beginning of the window
    pub msgid: i64,
    /// Page size
    pub number: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptPage {
    pub recordlist: Vec<TranscriptRecord>,
    #[serde(default)]
    pub number: i64,
    /// Last message id in this page; feed it back as the next `msgid`
    #[serde(default)]
    pub msgid: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptRecord {
    #[serde(default)]
    pub openid: String,
    /// Operation code, e.g. 2002 agent sent / 2003 agent received
    #[serde(default)]
    pub opercode: i64,
    #[serde(default)]
    pub text: String,
    /// Unix seconds
    #[serde(default)]
    pub time: i64,
    /// Agent account that handled the message
    #[serde(default)]
    pub worker: String,
}
