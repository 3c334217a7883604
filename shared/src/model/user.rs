use crate::{Query, SortOrder, ToQuery};
use serde::{Deserialize, Serialize};

wire_enum! {
    pub enum UserRole {
        SuperAdmin => "super_admin",
        Owner => "owner",
        Admin => "admin",
        Manager => "manager",
        Staff => "staff",
    }
}

wire_enum! {
    pub enum UserStatus {
        Active => "active",
        Inactive => "inactive",
        Pending => "pending",
        Suspended => "suspended",
    }
}

/// 用户所属租户：后端可能只给 id，也可能展开为对象
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TenantRef {
    Id(String),
    Expanded {
        #[serde(alias = "_id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        slug: Option<String>,
    },
}

impl TenantRef {
    pub fn id(&self) -> &str {
        match self {
            TenantRef::Id(id) => id,
            TenantRef::Expanded { id, .. } => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            TenantRef::Id(_) => None,
            TenantRef::Expanded { name, .. } => name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    pub name: String,
    pub role: UserRole,
    #[serde(default, alias = "is_active")]
    pub is_active: bool,
    #[serde(default)]
    pub status: Option<UserStatus>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, alias = "is_phone_verified")]
    pub is_phone_verified: bool,
    #[serde(default, alias = "tenant_id")]
    pub tenant_id: Option<TenantRef>,
    /// 部分接口把租户展开在 `tenant` 字段
    #[serde(default)]
    pub tenant: Option<TenantRef>,
    #[serde(default, alias = "last_login")]
    pub last_login: Option<String>,
    #[serde(default)]
    pub orders_processed: Option<u64>,
    #[serde(default)]
    pub invoices_created: Option<u64>,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updated_at")]
    pub updated_at: Option<String>,
}

impl User {
    pub fn tenant_ref(&self) -> Option<&TenantRef> {
        self.tenant_id.as_ref().or(self.tenant.as_ref())
    }

    pub fn key(&self) -> &str {
        match &self.object_id {
            Some(oid) if self.id.is_empty() => oid,
            _ => &self.id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleBreakdown {
    #[serde(default)]
    pub owner: u64,
    #[serde(default)]
    pub admin: u64,
    #[serde(default)]
    pub manager: u64,
    #[serde(default)]
    pub staff: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub pending: u64,
    #[serde(default)]
    pub by_role: RoleBreakdown,
    #[serde(default)]
    pub new_this_month: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    #[serde(default)]
    pub temporary_password: Option<String>,
}

// =========================================================
// Request Definitions
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub is_active: Option<bool>,
    pub tenant_id: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl ToQuery for UserFilters {
    fn to_query(&self) -> Query {
        Query::new()
            .param("page", self.page)
            .param("limit", self.limit)
            .param("role", self.role)
            .param("status", self.status)
            .param("isActive", self.is_active)
            .param("tenantId", self.tenant_id.as_deref())
            .param("search", self.search.as_deref())
            .param("sortBy", self.sort_by.as_deref())
            .param("sortOrder", self.sort_order)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusUpdate {
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub name: String,
    pub phone: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
