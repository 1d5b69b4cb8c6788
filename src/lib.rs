mod behavior;
mod block;
mod cache;
mod model;
mod session;

pub mod workflow;

pub use behavior::{
    BlockBehavior, BlockRegistry, HtmlBehavior, TextBehavior, UnknownBlockType, ValidationErrors,
};
pub use block::{random_id, Block, BlockFilter, PageHasBlock, Visibility};
pub use cache::{block_tag, InMemoryTagCache, TagCache};
pub use model::{
    InMemoryModelStore, Model, ModelRepository, ModelStore, ModelsExt, StoreError, Versioned,
};
pub use session::{DraftStore, InMemorySessionBackend, Session, SessionBackend};
