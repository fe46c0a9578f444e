//! Robot-arm integration scenario.
//!
//! Five combinators assemble an arm from a base through alternating motor
//! and link segments down to an effector. The motor count is carried in a
//! literal parameter: every motor step increments it, links and the base
//! preserve it, the effector starts it at zero. Querying `Base & c(3)` must
//! therefore yield exactly the arms with three motors.

use cls_solver::{
    Binding, Lit, LiteralDomains, Parameter, Repository, Schema, Semantics, TypeEnvironment,
    TypeInterner, enumerate_terms, inhabit, interpret_term,
};

struct RobotArm {
    interner: TypeInterner,
    repository: Repository,
    domains: LiteralDomains,
}

fn robot_arm() -> RobotArm {
    let interner = TypeInterner::new();
    let int = interner.intern_name("int");
    let c = interner.intern_name("c");
    let cur = interner.intern_name("cur");
    let next = interner.intern_name("next");

    let motor_ty = interner.ctor0(interner.intern_name("Motor"));
    let structural_ty = interner.ctor0(interner.intern_name("Structural"));
    let base_ty = interner.ctor0(interner.intern_name("Base"));
    let count = |var| interner.ctor(c, interner.var(var));

    let mut domains = LiteralDomains::new();
    domains.declare(int, (0..10).map(Lit::Int).collect());

    let mut repository = Repository::new();
    repository.insert(
        interner.intern_name("motor"),
        Schema::new(
            vec![
                Parameter::unconstrained(cur, int),
                Parameter::new(next, int, move |binding: &Binding| {
                    binding
                        .int(cur)
                        .zip(binding.int(next))
                        .is_some_and(|(current, following)| current + 1 == following)
                }),
            ],
            interner.intersection(
                interner.arrow(structural_ty, motor_ty),
                interner.arrow(count(cur), count(next)),
            ),
        ),
    );
    for link in ["link", "short_link"] {
        repository.insert(
            interner.intern_name(link),
            Schema::new(
                vec![Parameter::unconstrained(cur, int)],
                interner.intersection(
                    interner.arrow(motor_ty, structural_ty),
                    interner.arrow(count(cur), count(cur)),
                ),
            ),
        );
    }
    repository.insert(
        interner.intern_name("effector"),
        Schema::mono(interner.intersection(
            structural_ty,
            interner.ctor(c, interner.literal(Lit::Int(0), int)),
        )),
    );
    repository.insert(
        interner.intern_name("base"),
        Schema::new(
            vec![Parameter::unconstrained(cur, int)],
            interner.intersection(
                interner.arrow(motor_ty, base_ty),
                interner.arrow(count(cur), count(cur)),
            ),
        ),
    );

    RobotArm {
        interner,
        repository,
        domains,
    }
}

#[test]
fn test_every_arm_has_exactly_three_motors() {
    let arm = robot_arm();
    let interner = &arm.interner;

    let query = interner.intersection(
        interner.ctor0(interner.intern_name("Base")),
        interner.ctor(
            interner.intern_name("c"),
            interner.literal(Lit::Int(3), interner.intern_name("int")),
        ),
    );
    let grammar = inhabit(
        interner,
        &arm.repository,
        &TypeEnvironment::new(),
        &arm.domains,
        query,
    )
    .unwrap();

    assert!(!grammar.productions(query).is_empty());

    let terms: Vec<_> = enumerate_terms(&grammar, query).collect();
    // Two link positions with two link choices each.
    assert_eq!(terms.len(), 4);

    let motor = interner.intern_name("motor");
    let base = interner.intern_name("base");
    let effector = interner.intern_name("effector");
    for term in &terms {
        assert_eq!(term.count_combinator(motor), 3);
        assert_eq!(term.count_combinator(base), 1);
        assert_eq!(term.count_combinator(effector), 1);
    }
}

#[test]
fn test_motor_count_bindings_increase_down_the_arm() {
    let arm = robot_arm();
    let interner = &arm.interner;
    let cur = interner.intern_name("cur");
    let next = interner.intern_name("next");
    let motor = interner.intern_name("motor");

    let query = interner.intersection(
        interner.ctor0(interner.intern_name("Base")),
        interner.ctor(
            interner.intern_name("c"),
            interner.literal(Lit::Int(3), interner.intern_name("int")),
        ),
    );
    let grammar = inhabit(
        interner,
        &arm.repository,
        &TypeEnvironment::new(),
        &arm.domains,
        query,
    )
    .unwrap();

    let term = enumerate_terms(&grammar, query).next().unwrap();

    // Walk the spine collecting motor steps: (cur, next) pairs must be
    // (2, 3), (1, 2), (0, 1) from base to effector.
    let mut steps = Vec::new();
    let mut node = term;
    loop {
        if node.combinator() == motor {
            steps.push((
                node.binding().int(cur).unwrap(),
                node.binding().int(next).unwrap(),
            ));
        }
        match node.args().first() {
            Some(child) => node = child.clone(),
            None => break,
        }
    }
    assert_eq!(steps, vec![(2, 3), (1, 2), (0, 1)]);
}

#[test]
fn test_uninhabited_motor_count_has_no_terms() {
    let arm = robot_arm();
    let interner = &arm.interner;

    // Base & c(0) would need a motorless arm, but the base requires a motor
    // segment below it while preserving the count; the effector seeds 0 and
    // every motor increments, so no term exists at count 0.
    let query = interner.intersection(
        interner.ctor0(interner.intern_name("Base")),
        interner.ctor(
            interner.intern_name("c"),
            interner.literal(Lit::Int(0), interner.intern_name("int")),
        ),
    );
    let grammar = inhabit(
        interner,
        &arm.repository,
        &TypeEnvironment::new(),
        &arm.domains,
        query,
    )
    .unwrap();

    assert_eq!(enumerate_terms(&grammar, query).count(), 0);
}

#[test]
fn test_interpreting_an_arm_names_its_parts() {
    let arm = robot_arm();
    let interner = &arm.interner;

    let query = interner.intersection(
        interner.ctor0(interner.intern_name("Base")),
        interner.ctor(
            interner.intern_name("c"),
            interner.literal(Lit::Int(1), interner.intern_name("int")),
        ),
    );
    let grammar = inhabit(
        interner,
        &arm.repository,
        &TypeEnvironment::new(),
        &arm.domains,
        query,
    )
    .unwrap();

    let mut semantics: Semantics<String> = Semantics::new();
    for part in ["motor", "link", "short_link", "effector", "base"] {
        let name = part.to_owned();
        semantics.register(interner.intern_name(part), move |_, children: Vec<String>| {
            if children.is_empty() {
                name.clone()
            } else {
                format!("{}[{}]", name, children.join(", "))
            }
        });
    }

    let terms: Vec<_> = enumerate_terms(&grammar, query).collect();
    // One motor, no link positions: base[motor[effector]].
    assert_eq!(terms.len(), 1);
    let assembled = interpret_term(interner, &terms[0], &semantics).unwrap();
    assert_eq!(assembled, "base[motor[effector]]");
}
