use error_stack::Report;

use crate::entity::{Actor, LibraryId, Role, UserId};
use crate::KernelError;

/// The roles allowed to run one family of operations.
///
/// Every check is also scoped: the actor must belong to the library that owns the
/// target book, request or issue.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Capability {
    name: &'static str,
    roles: &'static [Role],
}

impl Capability {
    pub const MANAGE_CATALOG: Self = Self::new("manage_catalog", &[Role::LibraryAdmin]);
    pub const VIEW_CATALOG: Self =
        Self::new("view_catalog", &[Role::LibraryAdmin, Role::Reader]);
    pub const RAISE_REQUEST: Self = Self::new("raise_request", &[Role::Reader]);
    pub const DECIDE_REQUEST: Self = Self::new("decide_request", &[Role::LibraryAdmin]);
    pub const RETURN_BOOK: Self = Self::new("return_book", &[Role::LibraryAdmin, Role::Reader]);
    pub const VIEW_ISSUES: Self = Self::new("view_issues", &[Role::LibraryAdmin, Role::Reader]);

    const fn new(name: &'static str, roles: &'static [Role]) -> Self {
        Self { name, roles }
    }

    pub fn check(&self, actor: &Actor, scope: &LibraryId) -> error_stack::Result<(), KernelError> {
        if !self.roles.contains(actor.role()) {
            return Err(Report::new(KernelError::Forbidden).attach_printable(format!(
                "{} is not granted {}",
                actor.role(),
                self.name
            )));
        }
        if actor.lib_id() != scope {
            return Err(Report::new(KernelError::Forbidden).attach_printable(format!(
                "actor of library {} cannot reach library {}",
                actor.lib_id().as_ref(),
                scope.as_ref()
            )));
        }
        Ok(())
    }

    /// Same as [`Capability::check`], and additionally a reader may only act for themself.
    pub fn check_on_behalf(
        &self,
        actor: &Actor,
        scope: &LibraryId,
        reader_id: &UserId,
    ) -> error_stack::Result<(), KernelError> {
        self.check(actor, scope)?;
        if actor.is_reader() && actor.id() != reader_id {
            return Err(Report::new(KernelError::Forbidden).attach_printable(format!(
                "reader {} cannot act for reader {}",
                actor.id().as_ref(),
                reader_id.as_ref()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::entity::{Actor, LibraryId, Role, UserId};
    use crate::gate::Capability;
    use crate::KernelError;

    fn actor(role: Role, lib_id: i64) -> Actor {
        Actor::new(UserId::new(1), role, LibraryId::new(lib_id))
    }

    #[test]
    fn role_outside_capability_is_forbidden() {
        let report = Capability::MANAGE_CATALOG
            .check(&actor(Role::Reader, 1), &LibraryId::new(1))
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Forbidden);

        let report = Capability::RAISE_REQUEST
            .check(&actor(Role::Owner, 1), &LibraryId::new(1))
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Forbidden);
    }

    #[test]
    fn other_library_is_forbidden() {
        let report = Capability::DECIDE_REQUEST
            .check(&actor(Role::LibraryAdmin, 1), &LibraryId::new(2))
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Forbidden);
    }

    #[test]
    fn matching_role_and_scope_pass() {
        assert!(Capability::DECIDE_REQUEST
            .check(&actor(Role::LibraryAdmin, 1), &LibraryId::new(1))
            .is_ok());
        assert!(Capability::VIEW_CATALOG
            .check(&actor(Role::Reader, 1), &LibraryId::new(1))
            .is_ok());
    }

    #[test]
    fn reader_acts_only_for_themself() {
        let reader = actor(Role::Reader, 1);
        let scope = LibraryId::new(1);
        assert!(Capability::RETURN_BOOK
            .check_on_behalf(&reader, &scope, &UserId::new(1))
            .is_ok());
        let report = Capability::RETURN_BOOK
            .check_on_behalf(&reader, &scope, &UserId::new(2))
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Forbidden);

        let admin = actor(Role::LibraryAdmin, 1);
        assert!(Capability::RETURN_BOOK
            .check_on_behalf(&admin, &scope, &UserId::new(2))
            .is_ok());
    }
}
