use crate::dom::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] pricemark_core::Error),

    #[error("Node {node:?} cannot have children")]
    NotAContainer { node: NodeId },

    #[error("HTML rewrite failed: {0}")]
    HtmlRewrite(#[from] lol_html::errors::RewritingError),
}
