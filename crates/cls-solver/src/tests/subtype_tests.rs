use crate::intern::TypeInterner;
use crate::subtype::{SubtypeJudge, TypeEnvironment};
use crate::types::{Lit, TypeId};

#[test]
fn test_omega_is_top() {
    let interner = TypeInterner::new();
    let env = TypeEnvironment::new();
    let judge = SubtypeJudge::new(&interner, &env);

    let a = interner.ctor0(interner.intern_name("a"));
    let arrow = interner.arrow(a, a);

    assert!(judge.is_subtype(a, TypeId::OMEGA));
    assert!(judge.is_subtype(arrow, TypeId::OMEGA));
    assert!(judge.is_subtype(TypeId::OMEGA, TypeId::OMEGA));
    // ω is above everything, but below only ω-equivalent types.
    assert!(!judge.is_subtype(TypeId::OMEGA, a));
    assert!(judge.is_subtype(TypeId::OMEGA, interner.arrow(a, TypeId::OMEGA)));
}

#[test]
fn test_unrelated_constructors() {
    let interner = TypeInterner::new();
    let env = TypeEnvironment::new();
    let judge = SubtypeJudge::new(&interner, &env);

    let a = interner.ctor0(interner.intern_name("a"));
    let b = interner.ctor0(interner.intern_name("b"));

    assert!(judge.is_subtype(a, a));
    assert!(!judge.is_subtype(a, b));
    assert!(!judge.is_subtype(b, a));
}

#[test]
fn test_constructor_name_promotion() {
    let interner = TypeInterner::new();
    let dog = interner.intern_name("Dog");
    let animal = interner.intern_name("Animal");

    let mut env = TypeEnvironment::new();
    env.declare_supertypes(dog, [animal]);
    let judge = SubtypeJudge::new(&interner, &env);

    let dog_ty = interner.ctor0(dog);
    let animal_ty = interner.ctor0(animal);

    assert!(judge.is_subtype(dog_ty, animal_ty));
    assert!(!judge.is_subtype(animal_ty, dog_ty));
}

#[test]
fn test_environment_closure_is_transitive() {
    let interner = TypeInterner::new();
    let dog = interner.intern_name("Dog");
    let animal = interner.intern_name("Animal");
    let being = interner.intern_name("Being");

    let mut env = TypeEnvironment::new();
    env.declare_supertypes(dog, [animal]);
    env.declare_supertypes(animal, [being]);
    let judge = SubtypeJudge::new(&interner, &env);

    let dog_ty = interner.ctor0(dog);
    let being_ty = interner.ctor0(being);

    assert!(judge.is_subtype(dog_ty, being_ty));
    assert!(!judge.is_subtype(being_ty, dog_ty));
}

#[test]
fn test_constructor_argument_covariance() {
    let interner = TypeInterner::new();
    let env = TypeEnvironment::new();
    let judge = SubtypeJudge::new(&interner, &env);

    let a = interner.ctor0(interner.intern_name("a"));
    let b = interner.ctor0(interner.intern_name("b"));
    let c = interner.intern_name("c");

    let narrow = interner.ctor(c, interner.intersection(a, b));
    let wide = interner.ctor(c, a);

    assert!(judge.is_subtype(narrow, wide));
    assert!(!judge.is_subtype(wide, narrow));
    // Any application is below the bare constructor.
    assert!(judge.is_subtype(wide, interner.ctor0(c)));
}

#[test]
fn test_arrow_contravariance() {
    let interner = TypeInterner::new();
    let dog = interner.intern_name("Dog");
    let animal = interner.intern_name("Animal");

    let mut env = TypeEnvironment::new();
    env.declare_supertypes(dog, [animal]);
    let judge = SubtypeJudge::new(&interner, &env);

    let dog_ty = interner.ctor0(dog);
    let animal_ty = interner.ctor0(animal);
    let home = interner.ctor0(interner.intern_name("Home"));

    let accepts_animal = interner.arrow(animal_ty, home);
    let accepts_dog = interner.arrow(dog_ty, home);

    assert!(judge.is_subtype(accepts_animal, accepts_dog));
    assert!(!judge.is_subtype(accepts_dog, accepts_animal));
}

#[test]
fn test_product_covariance() {
    let interner = TypeInterner::new();
    let dog = interner.intern_name("Dog");
    let animal = interner.intern_name("Animal");

    let mut env = TypeEnvironment::new();
    env.declare_supertypes(dog, [animal]);
    let judge = SubtypeJudge::new(&interner, &env);

    let dog_ty = interner.ctor0(dog);
    let animal_ty = interner.ctor0(animal);

    let dogs = interner.product(dog_ty, dog_ty);
    let animals = interner.product(animal_ty, animal_ty);

    assert!(judge.is_subtype(dogs, animals));
    assert!(!judge.is_subtype(animals, dogs));
    // No product is below a constructor, and vice versa.
    assert!(!judge.is_subtype(dogs, dog_ty));
    assert!(!judge.is_subtype(dog_ty, dogs));
}

#[test]
fn test_intersection_on_both_sides() {
    let interner = TypeInterner::new();
    let env = TypeEnvironment::new();
    let judge = SubtypeJudge::new(&interner, &env);

    let a = interner.ctor0(interner.intern_name("a"));
    let b = interner.ctor0(interner.intern_name("b"));
    let both = interner.intersection(a, b);

    assert!(judge.is_subtype(both, a));
    assert!(judge.is_subtype(both, b));
    assert!(!judge.is_subtype(a, both));
    assert!(judge.is_subtype(both, interner.intersection(b, a)));
}

#[test]
fn test_arrow_intersection_distributes() {
    // (a -> b) & (a -> c) ≤ a -> b & c: both arrows contribute their
    // targets once the source matches.
    let interner = TypeInterner::new();
    let env = TypeEnvironment::new();
    let judge = SubtypeJudge::new(&interner, &env);

    let a = interner.ctor0(interner.intern_name("a"));
    let b = interner.ctor0(interner.intern_name("b"));
    let c = interner.ctor0(interner.intern_name("c"));

    let pointwise = interner.intersection(interner.arrow(a, b), interner.arrow(a, c));
    let joined = interner.arrow(a, interner.intersection(b, c));

    assert!(judge.is_subtype(pointwise, joined));
    assert!(judge.is_subtype(joined, pointwise));
}

#[test]
fn test_literals_are_singleton_atoms() {
    let interner = TypeInterner::new();
    let env = TypeEnvironment::new();
    let judge = SubtypeJudge::new(&interner, &env);

    let int = interner.intern_name("int");
    let word = interner.intern_name("word");
    let three = interner.literal(Lit::Int(3), int);
    let four = interner.literal(Lit::Int(4), int);
    let other_three = interner.literal(Lit::Int(3), word);

    assert!(judge.is_subtype(three, three));
    assert!(!judge.is_subtype(three, four));
    // Same value, different kind: unrelated singletons.
    assert!(!judge.is_subtype(three, other_three));
    assert!(judge.is_subtype(three, TypeId::OMEGA));
    assert!(judge.is_subtype(interner.intersection(three, four), three));
}

#[test]
fn test_variables_compare_by_name() {
    let interner = TypeInterner::new();
    let env = TypeEnvironment::new();
    let judge = SubtypeJudge::new(&interner, &env);

    let x = interner.var(interner.intern_name("x"));
    let y = interner.var(interner.intern_name("y"));

    assert!(judge.is_subtype(x, x));
    assert!(!judge.is_subtype(x, y));
}

#[test]
fn test_minimize_keeps_most_specific() {
    let interner = TypeInterner::new();
    let env = TypeEnvironment::new();
    let judge = SubtypeJudge::new(&interner, &env);

    let a = interner.ctor0(interner.intern_name("a"));
    let b = interner.ctor0(interner.intern_name("b"));
    let both = interner.intersection(a, b);

    assert_eq!(judge.minimize(&[a, both, TypeId::OMEGA]), vec![both]);
    assert_eq!(judge.minimize(&[TypeId::OMEGA, a]), vec![a]);

    // Incomparable types all survive.
    let kept = judge.minimize(&[a, b]);
    assert_eq!(kept, vec![a, b]);
}

#[test]
fn test_minimize_collapses_equivalent_types() {
    let interner = TypeInterner::new();
    let env = TypeEnvironment::new();
    let judge = SubtypeJudge::new(&interner, &env);

    let a = interner.ctor0(interner.intern_name("a"));
    let b = interner.ctor0(interner.intern_name("b"));
    let ab = interner.intersection(a, b);
    let ba = interner.intersection(b, a);

    // Mutually-subtype spellings collapse to the first seen.
    assert_eq!(judge.minimize(&[ab, ba]), vec![ab]);
}
