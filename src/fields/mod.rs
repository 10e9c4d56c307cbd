pub mod base;
pub mod boolean;
pub mod button;
pub mod custom;
pub mod group;
pub mod html;
pub mod input;
pub mod node;
pub mod selectable;
pub mod textarea;
pub mod traits;

pub use base::FieldBase;
pub use boolean::Boolean;
pub use button::Button;
pub use custom::CustomField;
pub use group::Group;
pub use html::Html;
pub use input::Input;
pub use node::Node;
pub use selectable::{SelectKind, SelectOption, Selectable};
pub use textarea::Textarea;
pub use traits::Fillable;
