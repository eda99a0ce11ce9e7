use super::*;
use crate::schema::{FieldMeta, RecordSchema};

const NUMERICS: [Type; 4] = [Type::Integer, Type::Long, Type::Double, Type::Decimal];

mod promote {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numeric_promotion_picks_the_wider_kind() {
        assert_eq!(Type::Integer.promote_with(&Type::Long), Type::Long);
        assert_eq!(Type::Long.promote_with(&Type::Integer), Type::Long);
        assert_eq!(Type::Double.promote_with(&Type::Decimal), Type::Decimal);
        assert_eq!(Type::Integer.promote_with(&Type::Double), Type::Double);
    }

    #[test]
    fn numeric_with_non_numeric_is_error() {
        for n in &NUMERICS {
            assert_eq!(n.promote_with(&Type::String), Type::Error);
            assert_eq!(Type::Boolean.promote_with(n), Type::Error);
            assert_eq!(n.promote_with(&Type::DateField), Type::Error);
        }
    }

    #[test]
    fn null_is_the_bottom() {
        assert_eq!(Type::Null.promote_with(&Type::String), Type::String);
        assert_eq!(Type::Date.promote_with(&Type::Null), Type::Date);
        assert_eq!(
            Type::list(Type::Integer).promote_with(&Type::Null),
            Type::list(Type::Integer)
        );
    }

    #[test]
    fn object_absorbs_all_but_void_and_error() {
        assert_eq!(Type::Object.promote_with(&Type::Integer), Type::Object);
        assert_eq!(Type::String.promote_with(&Type::Object), Type::Object);
        assert_eq!(Type::Object.promote_with(&Type::Object), Type::Object);
        assert_eq!(Type::Object.promote_with(&Type::Void), Type::Error);
        assert_eq!(Type::Void.promote_with(&Type::Object), Type::Error);
        assert_eq!(Type::Object.promote_with(&Type::Error), Type::Error);
    }

    #[test]
    fn void_only_meets_void() {
        assert_eq!(Type::Void.promote_with(&Type::Void), Type::Void);
        assert_eq!(Type::Void.promote_with(&Type::Integer), Type::Error);
        assert_eq!(Type::Integer.promote_with(&Type::Void), Type::Error);
    }

    #[test]
    fn error_absorbs_everything() {
        assert_eq!(Type::Error.promote_with(&Type::Integer), Type::Error);
        assert_eq!(Type::Null.promote_with(&Type::Error), Type::Error);
    }

    #[test]
    fn symbols_promote_only_with_their_own_kind() {
        assert_eq!(Type::DateField.promote_with(&Type::DateField), Type::DateField);
        assert_eq!(Type::LogLevel.promote_with(&Type::LogLevel), Type::LogLevel);
        assert_eq!(Type::DateField.promote_with(&Type::LogLevel), Type::Error);
        assert_eq!(Type::LogLevel.promote_with(&Type::Object), Type::Error);
    }

    #[test]
    fn structured_types_need_identical_structure() {
        let ints = Type::list(Type::Integer);
        assert_eq!(ints.promote_with(&ints), ints);
        assert_eq!(ints.promote_with(&Type::list(Type::Long)), Type::Error);
        let m = Type::map(Type::String, Type::Integer);
        assert_eq!(m.promote_with(&Type::map(Type::String, Type::Long)), Type::Error);
        let a = Type::record(RecordSchema::shared("a", vec![FieldMeta::new("x", Type::Integer)]));
        let b = Type::record(RecordSchema::shared("b", vec![FieldMeta::new("x", Type::Integer)]));
        assert_eq!(a.promote_with(&b), Type::Error);
    }

    #[test]
    fn type_variables_never_promote() {
        assert_eq!(Type::var("T").promote_with(&Type::Integer), Type::Error);
        assert_eq!(Type::Integer.promote_with(&Type::var("T")), Type::Error);
    }
}

mod assign {
    use super::*;

    #[test]
    fn widening_is_assignable_narrowing_is_not() {
        assert!(Type::Long.can_assign(&Type::Integer));
        assert!(Type::Decimal.can_assign(&Type::Double));
        assert!(!Type::Integer.can_assign(&Type::Long));
        assert!(!Type::Double.can_assign(&Type::Decimal));
    }

    #[test]
    fn null_assigns_to_everything_but_void() {
        assert!(Type::String.can_assign(&Type::Null));
        assert!(Type::list(Type::Integer).can_assign(&Type::Null));
        assert!(!Type::Void.can_assign(&Type::Null));
    }

    #[test]
    fn symbols_require_same_kind() {
        assert!(Type::DateField.can_assign(&Type::DateField));
        assert!(!Type::DateField.can_assign(&Type::LogLevel));
        assert!(!Type::String.can_assign(&Type::LogLevel));
    }

    #[test]
    fn object_accepts_scalars_and_containers() {
        assert!(Type::Object.can_assign(&Type::Integer));
        assert!(Type::Object.can_assign(&Type::map(Type::String, Type::String)));
        assert!(!Type::Integer.can_assign(&Type::Object));
    }

    #[test]
    fn unbound_record_accepts_any_record() {
        let bound = Type::record(RecordSchema::shared("a", vec![]));
        assert!(Type::any_record().can_assign(&bound));
        assert!(!bound.can_assign(&Type::String));
    }

    #[test]
    fn error_target_accepts_nothing_but_null() {
        assert!(!Type::Error.can_assign(&Type::Integer));
        assert!(Type::Error.can_assign(&Type::Null));
    }
}

mod distances {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn identical_types_have_zero_distance() {
        assert_eq!(distance(&Type::String, &Type::String), 0);
        assert_eq!(distance(&Type::list(Type::Long), &Type::list(Type::Long)), 0);
    }

    #[test]
    fn widening_steps_are_counted() {
        assert_eq!(distance(&Type::Integer, &Type::Long), 1);
        assert_eq!(distance(&Type::Integer, &Type::Double), 2);
        assert_eq!(distance(&Type::Integer, &Type::Decimal), 3);
        assert_eq!(distance(&Type::Long, &Type::Decimal), 2);
        assert_eq!(distance(&Type::Double, &Type::Decimal), 1);
    }

    #[test]
    fn narrowing_has_no_distance() {
        assert_eq!(distance(&Type::Long, &Type::Integer), DISTANCE_MAX);
        assert_eq!(distance(&Type::Decimal, &Type::Double), DISTANCE_MAX);
    }

    #[test]
    fn generic_targets_rank_below_widening() {
        assert_eq!(distance(&Type::String, &Type::var("T")), TYPE_VARIABLE_DISTANCE);
        assert!(distance(&Type::Integer, &Type::Decimal) < TYPE_VARIABLE_DISTANCE);
    }

    #[test]
    fn schema_free_containers_accept_same_shape() {
        let bound = Type::record(RecordSchema::shared("a", vec![]));
        assert_eq!(distance(&bound, &Type::any_record()), UNBOUND_STRUCTURE_DISTANCE);
        assert_eq!(
            distance(&Type::list(Type::String), &Type::list(Type::var("E"))),
            UNBOUND_STRUCTURE_DISTANCE
        );
        assert_eq!(
            distance(
                &Type::map(Type::String, Type::Date),
                &Type::map(Type::var("K"), Type::var("V"))
            ),
            UNBOUND_STRUCTURE_DISTANCE
        );
        assert_eq!(
            distance(&Type::String, &Type::list(Type::var("E"))),
            DISTANCE_MAX
        );
    }

    #[test]
    fn null_reaches_every_non_void_target() {
        assert_eq!(distance(&Type::Null, &Type::Decimal), 0);
        assert_eq!(distance(&Type::Null, &Type::any_record()), 0);
        assert_eq!(distance(&Type::Null, &Type::Void), DISTANCE_MAX);
    }

    #[test]
    fn unrelated_types_have_no_distance() {
        assert_eq!(distance(&Type::String, &Type::Integer), DISTANCE_MAX);
        assert_eq!(distance(&Type::Boolean, &Type::Date), DISTANCE_MAX);
        assert_eq!(distance(&Type::LogLevel, &Type::DateField), DISTANCE_MAX);
    }
}
