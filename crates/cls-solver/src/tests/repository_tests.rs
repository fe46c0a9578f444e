use crate::error::SolverError;
use crate::intern::TypeInterner;
use crate::repository::{
    Binding, LiteralDomains, Parameter, Repository, Schema, admissible_bindings, instantiate,
};
use crate::types::Lit;

fn int_domain(interner: &TypeInterner, upto: i64) -> LiteralDomains {
    let mut domains = LiteralDomains::new();
    domains.declare(
        interner.intern_name("int"),
        (0..upto).map(Lit::Int).collect(),
    );
    domains
}

#[test]
fn test_admissible_bindings_enumerate_domain_in_order() {
    let interner = TypeInterner::new();
    let int = interner.intern_name("int");
    let n = interner.intern_name("n");
    let domains = int_domain(&interner, 3);

    let schema = Schema::new(
        vec![Parameter::unconstrained(n, int)],
        interner.ctor(interner.intern_name("c"), interner.var(n)),
    );

    let bindings = admissible_bindings(&schema, &domains);
    let values: Vec<Option<i64>> = bindings.iter().map(|binding| binding.int(n)).collect();
    assert_eq!(values, vec![Some(0), Some(1), Some(2)]);
}

#[test]
fn test_predicate_sees_current_and_earlier_variables() {
    let interner = TypeInterner::new();
    let int = interner.intern_name("int");
    let cur = interner.intern_name("cur");
    let next = interner.intern_name("next");
    let domains = int_domain(&interner, 4);

    let schema = Schema::new(
        vec![
            Parameter::unconstrained(cur, int),
            Parameter::new(next, int, move |binding: &Binding| {
                binding.int(cur).zip(binding.int(next)).is_some_and(
                    |(current, following)| current + 1 == following,
                )
            }),
        ],
        interner.omega(),
    );

    let bindings = admissible_bindings(&schema, &domains);
    let pairs: Vec<(i64, i64)> = bindings
        .iter()
        .map(|binding| (binding.int(cur).unwrap(), binding.int(next).unwrap()))
        .collect();
    assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 3)]);
}

#[test]
fn test_empty_domain_yields_no_bindings() {
    let interner = TypeInterner::new();
    let n = interner.intern_name("n");
    // "unknown" was never declared: it behaves as an empty domain.
    let unknown = interner.intern_name("unknown");
    let domains = LiteralDomains::new();

    let schema = Schema::new(
        vec![Parameter::unconstrained(n, unknown)],
        interner.omega(),
    );

    assert!(admissible_bindings(&schema, &domains).is_empty());
}

#[test]
fn test_rejecting_predicate_prunes_the_binding_tree() {
    let interner = TypeInterner::new();
    let int = interner.intern_name("int");
    let n = interner.intern_name("n");
    let domains = int_domain(&interner, 10);

    let schema = Schema::new(
        vec![Parameter::new(n, int, move |binding: &Binding| {
            binding.int(n).is_some_and(|value| value < 3)
        })],
        interner.omega(),
    );

    assert_eq!(admissible_bindings(&schema, &domains).len(), 3);
}

#[test]
fn test_instantiate_substitutes_literals() {
    let interner = TypeInterner::new();
    let int = interner.intern_name("int");
    let c = interner.intern_name("c");
    let cur = interner.intern_name("cur");
    let next = interner.intern_name("next");
    let domains = int_domain(&interner, 3);

    let body = interner.arrow(
        interner.ctor(c, interner.var(cur)),
        interner.ctor(c, interner.var(next)),
    );
    let schema = Schema::new(
        vec![
            Parameter::unconstrained(cur, int),
            Parameter::new(next, int, move |binding: &Binding| {
                binding.int(cur).zip(binding.int(next)).is_some_and(
                    |(current, following)| current + 1 == following,
                )
            }),
        ],
        body,
    );

    let bindings = admissible_bindings(&schema, &domains);
    let instantiated = instantiate(&interner, schema.body(), &bindings[0]).unwrap();

    let expected = interner.arrow(
        interner.ctor(c, interner.literal(Lit::Int(0), int)),
        interner.ctor(c, interner.literal(Lit::Int(1), int)),
    );
    assert_eq!(instantiated, expected);
    assert!(!interner.has_vars(instantiated));
}

#[test]
fn test_instantiate_unbound_variable_fails() {
    let interner = TypeInterner::new();
    let body = interner.ctor(
        interner.intern_name("c"),
        interner.var(interner.intern_name("ghost")),
    );

    let err = instantiate(&interner, body, &Binding::empty()).unwrap_err();
    assert_eq!(
        err,
        SolverError::UnboundVariable {
            var: "ghost".to_owned()
        }
    );
}

#[test]
fn test_repository_preserves_insertion_order() {
    let interner = TypeInterner::new();
    let mut repository = Repository::new();
    let zig = interner.intern_name("zig");
    let alpha = interner.intern_name("alpha");

    repository.insert(zig, Schema::mono(interner.omega()));
    repository.insert(alpha, Schema::mono(interner.omega()));

    let order: Vec<_> = repository.iter().map(|(name, _)| name).collect();
    assert_eq!(order, vec![zig, alpha]);
}
