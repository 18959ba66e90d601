use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName};

/// Product category. Names are unique and used as the lookup key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
}
