//! Customer service account management (客服帐号管理)
//!
//! Lists agents and online agents, and adds, updates, invites, uploads
//! avatars for and deletes agent accounts. The access token always travels
//! as a query parameter and delete is a GET; both are what the service expects.

use chrono::Utc;
use tracing::{debug, info};

use crate::context::Context;
use crate::error::{KfError, Result, decode_response, decode_with_common_error};
use crate::types::{
    AgentAvatarUploadRequest, AgentCreateOrUpdateRequest, AgentDeleteRequest, AgentInviteRequest,
    AgentOnlineStatus, AgentSummary, KfListResponse, KfOnlineListResponse,
};

// =============================================================================
// API Endpoints
// =============================================================================

const KF_LIST_URL: &str = "https://api.weixin.qq.com/cgi-bin/customservice/getkflist";
const KF_ONLINE_LIST_URL: &str = "https://api.weixin.qq.com/cgi-bin/customservice/getonlinekflist";
const KF_ADD_URL: &str = "https://api.weixin.qq.com/customservice/kfaccount/add";
const KF_INVITE_WORKER_URL: &str = "https://api.weixin.qq.com/customservice/kfaccount/inviteworker";
const KF_UPDATE_URL: &str = "https://api.weixin.qq.com/customservice/kfaccount/update";
const KF_UPLOAD_HEADIMG_URL: &str = "https://api.weixin.qq.com/customservice/kfaccount/uploadheadimg";
const KF_DELETE_URL: &str = "https://api.weixin.qq.com/customservice/kfaccount/del";

/// Multipart field carrying the avatar image
const HEADIMG_FIELD: &str = "media";

/// Agent directory client
#[derive(Clone)]
pub struct Kf {
    ctx: Context,
}

impl Kf {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// All configured agents
    pub async fn get_kf_list(&self) -> Result<Vec<AgentSummary>> {
        let access_token = self.ctx.access_token().await?;
        let url = format!("{}?access_token={}", KF_LIST_URL, access_token);

        debug!("Fetching kf list");
        let response = self.ctx.transport().get(&url).await?;
        let res: KfListResponse = decode_response(&response, "GetKfList")?;

        Ok(res.kf_list)
    }

    /// Agents currently online
    pub async fn get_online_kf_list(&self) -> Result<Vec<AgentOnlineStatus>> {
        let access_token = self.ctx.access_token().await?;
        let url = format!("{}?access_token={}", KF_ONLINE_LIST_URL, access_token);

        debug!("Fetching online kf list");
        let response = self.ctx.transport().get(&url).await?;
        let res: KfOnlineListResponse = decode_response(&response, "GetOnlineKfList")?;

        Ok(res.kf_online_list)
    }

    pub async fn add_kf(&self, req: &AgentCreateOrUpdateRequest) -> Result<()> {
        self.post_account(KF_ADD_URL, req, "AddKf").await?;
        info!("Added kf account {}", req.kf_account);
        Ok(())
    }

    pub async fn update_kf(&self, req: &AgentCreateOrUpdateRequest) -> Result<()> {
        self.post_account(KF_UPDATE_URL, req, "UpdateKf").await?;
        info!("Updated kf account {}", req.kf_account);
        Ok(())
    }

    /// Invite a personal WeChat id to bind the account
    pub async fn invite_kf(&self, req: &AgentInviteRequest) -> Result<()> {
        self.post_account(KF_INVITE_WORKER_URL, req, "InviteKf")
            .await?;
        info!("Invited {} to bind {}", req.invite_wx, req.kf_account);
        Ok(())
    }

    /// Upload an avatar; the file name is the current unix time in seconds
    pub async fn upload_headimg(&self, req: &AgentAvatarUploadRequest) -> Result<()> {
        let access_token = self.ctx.access_token().await?;
        let url = format!(
            "{}?access_token={}&kf_account={}",
            KF_UPLOAD_HEADIMG_URL, access_token, req.kf_account
        );

        let file_name = Utc::now().timestamp().to_string();
        debug!("Uploading head image for {} as {}", req.kf_account, file_name);

        let response = self
            .ctx
            .transport()
            .post_multipart_base64(HEADIMG_FIELD, &file_name, &req.media, &url)
            .await?;
        decode_with_common_error(&response, "UploadHeadimg")?;

        info!("Uploaded head image for {}", req.kf_account);
        Ok(())
    }

    pub async fn delete_kf(&self, req: &AgentDeleteRequest) -> Result<()> {
        let access_token = self.ctx.access_token().await?;
        let url = format!(
            "{}?access_token={}&kf_account={}",
            KF_DELETE_URL, access_token, req.kf_account
        );

        debug!("Deleting kf account {}", req.kf_account);
        let response = self.ctx.transport().get(&url).await?;
        decode_with_common_error(&response, "DeleteKf")?;

        info!("Deleted kf account {}", req.kf_account);
        Ok(())
    }

    async fn post_account<T: serde::Serialize>(
        &self,
        endpoint: &str,
        req: &T,
        operation: &'static str,
    ) -> Result<()> {
        let access_token = self.ctx.access_token().await?;
        let url = format!("{}?access_token={}", endpoint, access_token);

        let body = serde_json::to_vec(req).map_err(|source| KfError::Encode {
            operation,
            source,
        })?;

        debug!("{}: POST {}", operation, endpoint);
        let response = self.ctx.transport().post_json(&url, body).await?;
        decode_with_common_error(&response, operation)
    }
}
