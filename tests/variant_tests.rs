//! Integration tests for rule variants and the variant registry.

use hironaka_engine::core::{EpisodeConfig, GameError, HostSubset, PointSet};
use hironaka_engine::engine::EpisodeController;
use hironaka_engine::geometry::{ReductionMode, VertexReducer};
use hironaka_engine::rules::{
    check_agent_axis, check_host_subset, CycleRules, FnPredicate, LinearTransformRules, PolyhedralRules,
    ReductionStabilized, RuleVariant, TerminalPredicate, VariantRegistry, VariantTag, Winner,
};

fn pts(points: &[&[i64]]) -> Vec<Vec<i64>> {
    points.iter().map(|p| p.to_vec()).collect()
}

// =============================================================================
// Variant Tags
// =============================================================================

#[test]
fn test_variant_names_round_trip() {
    for tag in VariantTag::ALL {
        assert_eq!(tag.name().parse::<VariantTag>(), Ok(tag));
        assert_eq!(tag.to_string(), tag.name());
    }
    assert_eq!(" Linear_Transform ".parse::<VariantTag>(), Ok(VariantTag::LinearTransform));
    assert!("zariski".parse::<VariantTag>().is_err());
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_standard_registry() {
    let registry = VariantRegistry::standard();

    assert_eq!(registry.len(), 3);
    assert_eq!(
        registry.tags(),
        vec![VariantTag::Basic, VariantTag::Hard, VariantTag::LinearTransform]
    );
    assert!(registry.contains(VariantTag::LinearTransform));
    assert!(!registry.contains(VariantTag::CycleMoving));
    assert!(matches!(
        registry.get(VariantTag::Thom),
        Err(GameError::UnsupportedVariant(VariantTag::Thom))
    ));
}

#[test]
fn test_empty_registry() {
    let registry = VariantRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.tags().is_empty());
}

#[test]
fn test_registry_lookup_returns_matching_rules() {
    let registry = VariantRegistry::standard();
    for tag in registry.tags() {
        let rules = registry.get(tag).map_err(|e| e.to_string()).unwrap();
        assert_eq!(rules.tag(), tag);
    }
}

/// Basic rules that stop once any coordinate reaches a bound.
struct BoundedBasic {
    bound: i64,
}

impl RuleVariant for BoundedBasic {
    fn tag(&self) -> VariantTag {
        VariantTag::Basic
    }

    fn transform(&self, state: &PointSet, subset: &HostSubset, axis: usize) -> Result<PointSet, GameError> {
        self.validate_host_choice(state, subset)?;
        check_agent_axis(subset, axis)?;
        state.apply_coordinate_map(axis, subset.as_slice())
    }

    fn is_terminal(&self, state: &PointSet) -> bool {
        state.is_singleton() || state.max_value() >= self.bound
    }
}

#[test]
fn test_custom_rules_plug_into_controller() {
    let registry = VariantRegistry::standard().with_rules(BoundedBasic { bound: 4 });
    let mut env = EpisodeController::with_registry(EpisodeConfig::default(), registry);
    env.reset(2, pts(&[&[2, 0], &[0, 2]]), VariantTag::Basic).unwrap();

    // (0,2) -> (2,2), then (2,2) -> (4,2)
    let first = env.step(&HostSubset::from([1, 2]), 1).unwrap();
    assert!(!first.terminal);
    let second = env.step(&HostSubset::from([1, 2]), 1).unwrap();
    assert!(second.terminal);
    assert_eq!(second.info.winner, Some(Winner::Host));
    assert_eq!(second.observation.points, pts(&[&[2, 0], &[4, 2]]));
}

#[test]
fn test_shared_checks() {
    let state = PointSet::new(3, vec![vec![1, 0, 0], vec![0, 1, 0]]).unwrap();

    assert!(check_host_subset(&state, &HostSubset::from([1, 3])).is_ok());
    assert!(check_host_subset(&state, &HostSubset::from([2])).is_err());
    assert!(check_host_subset(&state, &HostSubset::from([2, 5])).is_err());
    assert!(check_agent_axis(&HostSubset::from([1, 3]), 3).is_ok());
    assert!(check_agent_axis(&HostSubset::from([1, 3]), 2).is_err());
}

// =============================================================================
// Polyhedral Variants
// =============================================================================

#[test]
fn test_hard_matches_basic_moves() {
    let state = PointSet::new(3, vec![vec![1, 2, 0], vec![0, 1, 3], vec![4, 0, 1]]).unwrap();
    let basic = PolyhedralRules::basic();
    let hard = PolyhedralRules::hard();

    for subset in HostSubset::enumerate(3).unwrap() {
        for axis in subset.iter() {
            assert_eq!(
                basic.transform(&state, &subset, axis),
                hard.transform(&state, &subset, axis)
            );
        }
    }
    assert_eq!(hard.tag(), VariantTag::Hard);
}

#[test]
fn test_basic_keeps_dominated_points() {
    let state = PointSet::new(2, vec![vec![1, 0], vec![0, 1]]).unwrap();
    let next = PolyhedralRules::basic()
        .transform(&state, &HostSubset::from([1, 2]), 1)
        .unwrap();

    // (1,1) dominates (1,0) but the basic game does not reduce
    assert_eq!(next.to_vecs(), vec![vec![1, 0], vec![1, 1]]);
}

#[test]
fn test_domination_reducer_through_registry() {
    // (1,1) lies on the segment between the other two points
    let points = pts(&[&[0, 2], &[1, 1], &[2, 0]]);

    let mut exact = EpisodeController::new(EpisodeConfig::default());
    let obs = exact.reset(2, points.clone(), VariantTag::LinearTransform).unwrap();
    assert_eq!(obs.points, pts(&[&[0, 2], &[2, 0]]));

    let loose = LinearTransformRules::with_reducer(VertexReducer::with_mode(ReductionMode::Domination));
    let registry = VariantRegistry::standard().with_rules(loose);
    let mut env = EpisodeController::with_registry(EpisodeConfig::default(), registry);
    let obs = env.reset(2, points, VariantTag::LinearTransform).unwrap();
    assert_eq!(obs.points.len(), 3);
}

#[test]
fn test_linear_reduces_where_basic_does_not() {
    let state = PointSet::new(2, vec![vec![1, 0], vec![0, 1]]).unwrap();
    let next = LinearTransformRules::new()
        .transform(&state, &HostSubset::from([1, 2]), 1)
        .unwrap();
    assert_eq!(next.to_vecs(), vec![vec![1, 0]]);
}

// =============================================================================
// Cycle And Thom Variants
// =============================================================================

#[test]
fn test_cycle_with_reduction_stabilized() {
    let registry = VariantRegistry::standard().with_rules(CycleRules::cycle_moving(ReductionStabilized::new()));
    let mut env = EpisodeController::with_registry(EpisodeConfig::default(), registry);

    let obs = env
        .reset(2, pts(&[&[1, 0], &[0, 1]]), VariantTag::CycleMoving)
        .unwrap();
    assert_eq!(obs.variant, VariantTag::CycleMoving);
    assert!(!env.is_terminal());

    let result = env.step(&HostSubset::from([1, 2]), 1).unwrap();
    assert!(result.terminal);
    assert_eq!(result.reward, 0.0);
    assert_eq!(result.observation.points, pts(&[&[1, 0]]));
}

#[test]
fn test_thom_predicate_decides_end() {
    let predicate = FnPredicate::new("max >= 3", |s: &PointSet| s.max_value() >= 3);
    let mut env = EpisodeController::new(EpisodeConfig::default());
    env.registry_mut().register(CycleRules::thom(predicate));

    env.reset(2, pts(&[&[2, 1], &[0, 2]]), VariantTag::Thom).unwrap();
    assert!(!env.is_terminal());

    // (2,1) -> (3,1), (0,2) -> (2,2): two vertices, but the predicate fires
    let result = env.step(&HostSubset::from([1, 2]), 1).unwrap();
    assert!(result.terminal);
    assert_eq!(result.observation.points, pts(&[&[2, 2], &[3, 1]]));
    assert_eq!(result.info.winner, Some(Winner::Host));
}

#[test]
fn test_thom_singleton_is_not_terminal_unless_predicate_says_so() {
    let rules = CycleRules::thom(FnPredicate::new("never", |_: &PointSet| false));
    let single = PointSet::new(2, vec![vec![1, 1]]).unwrap();

    assert!(!rules.is_terminal(&single));
    assert_eq!(rules.winner(&single), None);
}

#[test]
fn test_reduction_stabilized_sees_collapsing_move() {
    // (0,3) maps to (3,3) on axis 1, which (3,0) dominates
    let state = PointSet::new(2, vec![vec![0, 3], vec![3, 0]]).unwrap();
    assert!(!ReductionStabilized::new().is_terminal(&state));
}
