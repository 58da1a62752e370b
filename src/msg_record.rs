//! Customer service chat transcripts (聊天记录)

use tracing::debug;

use crate::context::Context;
use crate::error::{KfError, Result, decode_response};
use crate::types::{TranscriptPage, TranscriptQuery};

const MSG_RECORD_URL: &str = "https://api.weixin.qq.com/customservice/msgrecord/getmsglist";

/// Transcript client
///
/// One call returns one page. To walk a whole window, issue the next query
/// with `msgid` set to the returned page's `msgid`.
#[derive(Clone)]
pub struct MsgRecord {
    ctx: Context,
}

impl MsgRecord {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    pub async fn get_msg_list(&self, req: &TranscriptQuery) -> Result<TranscriptPage> {
        let access_token = self.ctx.access_token().await?;
        let url = format!("{}?access_token={}", MSG_RECORD_URL, access_token);

        let body = serde_json::to_vec(req).map_err(|source| KfError::Encode {
            operation: "GetMsgList",
            source,
        })?;

        debug!(
            "Fetching msg records {}..{} from msgid {} (page size {})",
            req.starttime, req.endtime, req.msgid, req.number
        );
        let response = self.ctx.transport().post_json(&url, body).await?;
        let page: TranscriptPage = decode_response(&response, "GetMsgList")?;

        debug!(
            "Fetched {} msg records, last msgid {}",
            page.recordlist.len(),
            page.msgid
        );
        Ok(page)
    }
}
