use crate::domain::models::auth::role::{Role, RoleSet};

/// 인증 모드를 정의하는 열거형
#[derive(Debug, Clone, PartialEq)]
pub enum AuthMode {
    /// 인증이 반드시 필요함
    Required,
    /// 인증이 선택사항임 (있으면 검증, 없어도 허용)
    Optional,
}

/// 라우트가 요구하는 역할 정보
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredRole {
    allowed: RoleSet,
}

impl RequiredRole {
    pub fn new(allowed: RoleSet) -> Self {
        Self { allowed }
    }

    pub fn single(role: Role) -> Self {
        Self::new(RoleSet::from(role))
    }

    pub fn any_of(roles: &[Role]) -> Self {
        Self::new(RoleSet::of(roles))
    }

    /// 사용자 역할이 허용 집합에 포함되는지 확인
    pub fn is_satisfied(&self, role: Role) -> bool {
        self.allowed.contains(role)
    }

    pub fn allowed(&self) -> &RoleSet {
        &self.allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_role_single() {
        let required = RequiredRole::single(Role::Admin);

        assert!(required.is_satisfied(Role::Admin));
        assert!(!required.is_satisfied(Role::Buyer));
    }

    #[test]
    fn test_required_role_any() {
        let required = RequiredRole::any_of(&[Role::Seller, Role::Admin]);

        assert!(required.is_satisfied(Role::Seller));
        assert!(required.is_satisfied(Role::Admin));
        assert!(!required.is_satisfied(Role::Buyer));
    }
}
