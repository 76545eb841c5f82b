//! Plain data types. The registry records implement
//! [`ActorEntity`](actor_framework::ActorEntity) in their actor modules.

pub mod account;
pub mod location;
pub mod payment;
pub mod ride;

pub use account::*;
pub use location::*;
pub use payment::*;
pub use ride::*;
