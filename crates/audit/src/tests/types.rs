// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Action, Actor, AuditEvent, Cause, StateSnapshot};

#[test]
fn test_actor_creation_requires_all_fields() {
    let actor: Actor = Actor::new(String::from("user-123"), String::from("employee"));

    assert_eq!(actor.id, "user-123");
    assert_eq!(actor.actor_type, "employee");
}

#[test]
fn test_cause_creation_requires_all_fields() {
    let cause: Cause = Cause::new(String::from("req-456"), String::from("Employee request"));

    assert_eq!(cause.id, "req-456");
    assert_eq!(cause.description, "Employee request");
}

#[test]
fn test_action_creation_with_details() {
    let action: Action = Action::new(
        String::from("CommitToBike"),
        Some(String::from("Committed to bike 'bike-7'")),
    );

    assert_eq!(action.name, "CommitToBike");
    assert_eq!(action.details, Some(String::from("Committed to bike 'bike-7'")));
}

#[test]
fn test_audit_event_creation_requires_all_fields() {
    let actor: Actor = Actor::new(String::from("hr-1"), String::from("hr"));
    let cause: Cause = Cause::new(String::from("req-456"), String::from("HR action"));
    let action: Action = Action::new(String::from("TerminateBenefit"), None);
    let before: StateSnapshot = StateSnapshot::new(String::from("status=active"));
    let after: StateSnapshot = StateSnapshot::new(String::from("status=terminated"));

    let event: AuditEvent = AuditEvent::new(
        actor.clone(),
        cause.clone(),
        action.clone(),
        before.clone(),
        after.clone(),
        String::from("user-123"),
    );

    assert_eq!(event.actor, actor);
    assert_eq!(event.cause, cause);
    assert_eq!(event.action, action);
    assert_eq!(event.before, before);
    assert_eq!(event.after, after);
    assert_eq!(event.user_id, "user-123");
}

#[test]
fn test_audit_event_equality() {
    let make = || {
        AuditEvent::new(
            Actor::new(String::from("user-123"), String::from("employee")),
            Cause::new(String::from("req-456"), String::from("Employee request")),
            Action::new(String::from("ChooseBike"), None),
            StateSnapshot::new(String::from("status=inactive")),
            StateSnapshot::new(String::from("status=searching")),
            String::from("user-123"),
        )
    };

    assert_eq!(make(), make());
}
