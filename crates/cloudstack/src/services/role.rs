//! Roles and role permissions.

use serde::{Deserialize, Serialize};

use crate::client::CloudStackClient;
use crate::error::CloudStackResult;
use crate::http::Transport;
use crate::services::{
    apply_options, not_found_as_no_match, pick_by_id, pick_by_name, LookupOption, Resource,
    Scoped, SuccessResponse,
};

cloudstack_params! {
    /// Parameters for `createRole`.
    CreateRoleParams {
        required {
            name: String => "name",
            role_type: String => "type",
        }
        optional {
            description: String => "description",
        }
    }
}

cloudstack_params! {
    /// Parameters for `updateRole`.
    UpdateRoleParams {
        required {
            id: String => "id",
        }
        optional {
            description: String => "description",
            name: String => "name",
            role_type: String => "type",
        }
    }
}

cloudstack_params! {
    /// Parameters for `deleteRole`.
    DeleteRoleParams {
        required {
            id: String => "id",
        }
        optional {}
    }
}

cloudstack_params! {
    /// Parameters for `listRoles`.
    ListRolesParams {
        required {}
        optional {
            id: String => "id",
            name: String => "name",
            role_type: String => "type",
        }
    }
}

impl Scoped for ListRolesParams {}

cloudstack_params! {
    /// Parameters for `createRolePermission`.
    CreateRolePermissionParams {
        required {
            permission: String => "permission",
            roleid: String => "roleid",
            rule: String => "rule",
        }
        optional {
            description: String => "description",
        }
    }
}

cloudstack_params! {
    /// Parameters for `updateRolePermission`.
    ///
    /// Either reorder the rules with `ruleorder`, or change one rule's
    /// `permission` with `ruleid`.
    UpdateRolePermissionParams {
        required {
            roleid: String => "roleid",
        }
        optional {
            permission: String => "permission",
            ruleid: String => "ruleid",
            ruleorder: Vec<String> => "ruleorder",
        }
    }
}

cloudstack_params! {
    /// Parameters for `deleteRolePermission`.
    DeleteRolePermissionParams {
        required {
            id: String => "id",
        }
        optional {}
    }
}

cloudstack_params! {
    /// Parameters for `listRolePermissions`.
    ListRolePermissionsParams {
        required {}
        optional {
            roleid: String => "roleid",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    pub description: String,
    pub id: String,
    pub jobid: String,
    pub jobstatus: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub role_type: String,
}

impl Resource for Role {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolePermission {
    pub description: String,
    pub id: String,
    pub jobid: String,
    pub jobstatus: i32,
    pub permission: String,
    pub roleid: String,
    pub rolename: String,
    pub rule: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListRolesResponse {
    pub count: i64,
    #[serde(rename = "role")]
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListRolePermissionsResponse {
    pub count: i64,
    #[serde(rename = "rolepermission")]
    pub role_permissions: Vec<RolePermission>,
}

pub struct RoleService<'a, T: Transport> {
    client: &'a CloudStackClient<T>,
}

impl<'a, T: Transport> RoleService<'a, T> {
    pub(crate) fn new(client: &'a CloudStackClient<T>) -> Self {
        Self { client }
    }

    /// Creates a role.
    pub fn create_role(&self, params: &CreateRoleParams) -> CloudStackResult<Role> {
        self.client.call_record("createRole", params, "role")
    }

    /// Updates a role's name, type or description.
    pub fn update_role(&self, params: &UpdateRoleParams) -> CloudStackResult<Role> {
        self.client.call_record("updateRole", params, "role")
    }

    /// Deletes a role.
    pub fn delete_role(&self, params: &DeleteRoleParams) -> CloudStackResult<SuccessResponse> {
        self.client.call("deleteRole", params)
    }

    /// Lists roles.
    pub fn list_roles(&self, params: &ListRolesParams) -> CloudStackResult<ListRolesResponse> {
        self.client.call("listRoles", params)
    }

    /// Adds a permission rule to a role.
    pub fn create_role_permission(
        &self,
        params: &CreateRolePermissionParams,
    ) -> CloudStackResult<RolePermission> {
        self.client.call_record("createRolePermission", params, "rolepermission")
    }

    /// Updates a permission rule or the rule order of a role.
    pub fn update_role_permission(
        &self,
        params: &UpdateRolePermissionParams,
    ) -> CloudStackResult<SuccessResponse> {
        self.client.call("updateRolePermission", params)
    }

    /// Removes a permission rule.
    pub fn delete_role_permission(
        &self,
        params: &DeleteRolePermissionParams,
    ) -> CloudStackResult<SuccessResponse> {
        self.client.call("deleteRolePermission", params)
    }

    /// Lists the permission rules of roles.
    pub fn list_role_permissions(
        &self,
        params: &ListRolePermissionsParams,
    ) -> CloudStackResult<ListRolePermissionsResponse> {
        self.client.call("listRolePermissions", params)
    }

    pub fn get_role_id(&self, name: &str, options: &[LookupOption]) -> CloudStackResult<String> {
        let mut params = ListRolesParams::new().with_name(name);
        apply_options(&mut params, self.client, options);

        let list = self.list_roles(&params)?;
        pick_by_name(name, list.roles).map(|role| role.id)
    }

    pub fn get_role_by_name(&self, name: &str, options: &[LookupOption]) -> CloudStackResult<Role> {
        let id = self.get_role_id(name, options)?;
        self.get_role_by_id(&id, options)
    }

    pub fn get_role_by_id(&self, id: &str, options: &[LookupOption]) -> CloudStackResult<Role> {
        let mut params = ListRolesParams::new().with_id(id);
        apply_options(&mut params, self.client, options);

        let list = self
            .list_roles(&params)
            .map_err(|err| not_found_as_no_match(id, err))?;
        pick_by_id(id, list.roles)
    }
}
