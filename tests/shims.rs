//! Integration tests for the shim layer wired through the resolver.
//!
//! The inline unit tests cover builder validation in isolation; these tests
//! exercise member-backed factory registrations end to end: static members,
//! receiver-bound members, visibility grants, and the errors a misconfigured
//! registration surfaces at registration time rather than at the first call.

use dotresolve::prelude::*;
use std::sync::Arc;

struct Connection {
    url: String,
    pooled: bool,
}

fn open_descriptor() -> MemberDescriptor {
    MemberDescriptor::static_function(
        "Connection::open",
        "Connection",
        vec![ParamType::String, ParamType::Boolean],
        ParamType::of::<Connection>(),
        |_, args| {
            Ok(Value::from_instance(Connection {
                url: args[0].as_str().unwrap_or_default().to_string(),
                pooled: args[1].as_boolean().unwrap_or(false),
            }))
        },
    )
}

#[test]
fn static_member_factory_resolves_with_coercion() {
    let resolver = Resolver::new();
    resolver
        .register_member_factory::<Connection>(&open_descriptor(), &HostContext::public())
        .unwrap();

    // The pooled flag arrives as a string and is coerced on the way in.
    let connection = resolver
        .get::<Connection>(&[Value::from("db://local"), Value::from("true")])
        .unwrap();
    assert_eq!(connection.url, "db://local");
    assert!(connection.pooled);
}

#[test]
fn instance_member_requires_bound_registration() {
    let resolver = Resolver::new();
    let getter = MemberDescriptor::property_getter(
        "Settings::theme",
        "Settings",
        ParamType::String,
        |_, _| Ok(Value::from("dark")),
    );

    let err = resolver
        .register_member_factory::<String>(&getter, &HostContext::public())
        .unwrap_err();
    assert!(matches!(err, Error::ReceiverMismatch { .. }));
    assert!(!resolver.has_factory::<String>());
}

struct Settings {
    theme: String,
}

#[test]
fn bound_property_getter_reads_its_receiver() {
    let resolver = Resolver::new();
    let getter = MemberDescriptor::property_getter(
        "Settings::theme",
        "Settings",
        ParamType::String,
        |instance, _| {
            let settings = instance
                .and_then(|v| v.instance_ref::<Settings>())
                .ok_or_else(|| TargetError::from("missing receiver"))?;
            Ok(Value::from(settings.theme.clone()))
        },
    );

    let receiver = Value::from_instance(Settings {
        theme: "solarized".to_string(),
    });
    resolver
        .register_bound_factory::<String>(&getter, &HostContext::public(), receiver)
        .unwrap();

    // Property getters take no arguments; each resolution re-reads the
    // bound receiver.
    assert_eq!(resolver.get::<String>(&[]).unwrap(), "solarized");
    assert_eq!(resolver.get::<String>(&[]).unwrap(), "solarized");
}

#[test]
fn static_member_cannot_be_bound() {
    let resolver = Resolver::new();
    let err = resolver
        .register_bound_factory::<Connection>(
            &open_descriptor(),
            &HostContext::public(),
            Value::from_instance(0u8),
        )
        .unwrap_err();
    assert!(matches!(err, Error::ReceiverMismatch { .. }));
}

#[test]
fn procedure_cannot_back_a_factory() {
    let resolver = Resolver::new();
    let procedure =
        MemberDescriptor::static_procedure("Cache::flush", "Cache", Vec::new(), |_, _| {
            Ok(Value::Null)
        });

    let err = resolver
        .register_member_factory::<()>(&procedure, &HostContext::public())
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedMemberShape(_)));
}

#[test]
fn visibility_is_checked_at_registration_time() {
    let resolver = Resolver::new();
    let internal = open_descriptor().with_flags(MemberFlags::STATIC);

    let err = resolver
        .register_member_factory::<Connection>(&internal, &HostContext::public())
        .unwrap_err();
    assert!(matches!(err, Error::MemberNotAccessible { .. }));

    // A context granting the declaring scope reaches the member.
    let granted = HostContext::named("integration").grant("Connection");
    resolver
        .register_member_factory::<Connection>(&internal, &granted)
        .unwrap();
    let connection = resolver
        .get::<Connection>(&[Value::from("db://x"), Value::Boolean(false)])
        .unwrap();
    assert_eq!(connection.url, "db://x");
}

#[test]
fn arity_limit_surfaces_at_registration_time() {
    let resolver = Resolver::new();
    let wide = MemberDescriptor::static_function(
        "Connection::wide",
        "Connection",
        vec![ParamType::I4; MAX_STATIC_PARAMS + 1],
        ParamType::of::<Connection>(),
        |_, _| Ok(Value::Null),
    );

    let err = resolver
        .register_member_factory::<Connection>(&wide, &HostContext::public())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::TooManyParameters {
            max: MAX_STATIC_PARAMS,
            ..
        }
    ));
}

#[test]
fn type_initializer_never_becomes_a_factory() {
    let resolver = Resolver::new();
    let initializer = MemberDescriptor::type_initializer("Connection::.cctor", "Connection");

    let err = resolver
        .register_member_factory::<Connection>(&initializer, &HostContext::public())
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedMemberShape(_)));
}

#[test]
fn shared_builder_caches_across_callers() {
    let descriptor = MemberDescriptor::static_function(
        "Clock::epoch",
        "Clock",
        Vec::new(),
        ParamType::I8,
        |_, _| Ok(Value::I8(0)),
    );

    let builder = ShimBuilder::new();
    let first = builder.build(&descriptor, &HostContext::public()).unwrap();
    let second = builder.build(&descriptor, &HostContext::public()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // A different requesting context compiles its own slot even for the
    // same member.
    let other = builder
        .build(&descriptor, &HostContext::named("other"))
        .unwrap();
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(builder.len(), 2);
}

#[test]
fn bound_instance_function_receives_call_arguments() {
    struct Counter {
        step: i32,
    }

    let resolver = Resolver::new();
    let advance = MemberDescriptor::instance_function(
        "Counter::advance",
        "Counter",
        vec![ParamType::I4],
        ParamType::I4,
        |instance, args| {
            let counter = instance
                .and_then(|v| v.instance_ref::<Counter>())
                .ok_or_else(|| TargetError::from("missing receiver"))?;
            Ok(Value::I4(args[0].as_i32().unwrap_or(0) + counter.step))
        },
    );

    resolver
        .register_bound_factory::<i32>(
            &advance,
            &HostContext::public(),
            Value::from_instance(Counter { step: 10 }),
        )
        .unwrap();

    assert_eq!(resolver.get::<i32>(&[Value::from("32")]).unwrap(), 42);
}
