//! WeChat Official Account Customer Service Client
//!
//! Wraps the customer service (客服) part of the Official Account API:
//! agent account management and chat transcript retrieval.
//!
//! # Architecture
//!
//! ```text
//! Kf / MsgRecord ──▶ Context ──┬── AccessContext (access_token)
//!                              └── Transport ──HTTPS──▶ api.weixin.qq.com
//! ```
//!
//! Every call fetches a token, appends it as `access_token=` to the endpoint
//! URL, performs one request and decodes the JSON reply. Non-zero `errcode`
//! values come back as [`KfError::Remote`] tagged with the operation name.
//!
//! # Usage
//!
//! ```no_run
//! use wechat_kf::prelude::*;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let ctx = KfConfig::from_env()?.build_context()?;
//! let kf = Kf::new(ctx.clone());
//!
//! kf.add_kf(&AgentCreateOrUpdateRequest::new("test1@gh_123", "客服1")).await?;
//! for agent in kf.get_kf_list().await? {
//!     println!("{} {}", agent.kf_account, agent.kf_nick);
//! }
//!
//! let page = MsgRecord::new(ctx)
//!     .get_msg_list(&TranscriptQuery { starttime: 1400563710, endtime: 1400567310, msgid: 1, number: 50 })
//!     .await?;
//! println!("{} records", page.recordlist.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod kf;
pub mod msg_record;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::KfConfig;
pub use context::{AccessContext, Context, StaticAccessToken, WechatAccessToken};
pub use error::{CommonError, KfError, TokenError, TransportError, decode_with_common_error};
pub use kf::Kf;
pub use msg_record::MsgRecord;
pub use transport::{HttpTransport, Transport};
pub use types::*;

/// Prelude for common imports
pub mod prelude {
    pub use crate::config::KfConfig;
    pub use crate::context::{AccessContext, Context};
    pub use crate::error::KfError;
    pub use crate::kf::Kf;
    pub use crate::msg_record::MsgRecord;
    pub use crate::types::*;
}
