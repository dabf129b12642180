//! Tests for dependency derivation of marshalling info
//!
//! This module tests that:
//! 1. Only linear collections report dependencies
//! 2. The count element comes first and placeholders are skipped
//! 3. Element marshallers contribute their own dependencies transitively
//! 4. Mode tables read back exactly as built

use interop_marshalling::{
    CountInfo, CustomTypeMarshallerData, CustomTypeMarshallers, LinearCollectionMarshallingInfo,
    MarshalMode, MarshallerShape, MarshallingInfo, SizeAndParamIndexInfo,
};
use interop_types::{ManagedTypeInfo, SignatureIndex, SpecialType, TypePositionInfo};
use pretty_assertions::assert_eq;
use rustc_hash::FxHashSet;

// =========================================================================
// Helper functions
// =========================================================================

fn int() -> ManagedTypeInfo {
    ManagedTypeInfo::special(SpecialType::Int32)
}

fn param(name: &str, index: u32) -> TypePositionInfo {
    TypePositionInfo::parameter(name, int(), index)
}

fn placeholder(name: &str) -> TypePositionInfo {
    TypePositionInfo::new(name, int())
}

fn array_marshaller() -> ManagedTypeInfo {
    ManagedTypeInfo::reference(
        "global::System.Runtime.InteropServices.Marshalling.ArrayMarshaller<,>",
        "System.Runtime.InteropServices.Marshalling.ArrayMarshaller<,>",
    )
}

/// Mode data for a collection whose elements marshal with `element_info`
fn element_mode(element_info: MarshallingInfo) -> CustomTypeMarshallerData {
    CustomTypeMarshallerData::scalar(
        array_marshaller(),
        ManagedTypeInfo::pointer("byte*", "byte*", false),
        false,
        MarshallerShape::TO_UNMANAGED | MarshallerShape::CALLER_ALLOCATED_BUFFER,
        false,
    )
    .with_buffer_element_type(ManagedTypeInfo::special(SpecialType::Byte))
    .with_collection_element(int(), element_info)
}

fn collection(count: CountInfo, marshallers: CustomTypeMarshallers) -> MarshallingInfo {
    LinearCollectionMarshallingInfo::new(
        array_marshaller(),
        marshallers,
        count,
        ManagedTypeInfo::type_parameter("T"),
    )
    .into()
}

fn dependency_names(info: &MarshallingInfo) -> Vec<&str> {
    info.dependencies()
        .map(|position| position.instance_identifier.as_str())
        .collect()
}

// =========================================================================
// Count element
// =========================================================================

#[test]
fn test_live_count_element_is_reported() {
    let info = collection(
        CountInfo::CountElement(param("length", 2)),
        CustomTypeMarshallers::default(),
    );
    assert_eq!(info.dependencies().next(), Some(&param("length", 2)));
    assert_eq!(dependency_names(&info), vec!["length"]);
}

#[test]
fn test_placeholder_count_element_is_skipped() {
    let info = collection(
        CountInfo::CountElement(placeholder("length")),
        CustomTypeMarshallers::default(),
    );
    assert_eq!(info.dependencies().count(), 0);
}

#[test]
fn test_return_value_count_element_is_reported() {
    let ret = TypePositionInfo::return_value(int());
    let info = collection(CountInfo::CountElement(ret.clone()), CustomTypeMarshallers::default());
    assert_eq!(info.dependencies().collect::<Vec<_>>(), vec![&ret]);
}

#[test]
fn test_size_and_param_index_is_not_a_dependency() {
    let count = SizeAndParamIndexInfo::UNSPECIFIED
        .with_const_size(4)
        .with_param(param("extra", 1));
    let info = collection(count.into(), CustomTypeMarshallers::default());
    assert_eq!(info.dependencies().count(), 0);
}

#[test]
fn test_const_and_no_count_have_no_dependencies() {
    for count in [CountInfo::NoCount, CountInfo::ConstSize { size: 8 }] {
        let info = collection(count, CustomTypeMarshallers::default());
        assert_eq!(info.dependencies().count(), 0);
    }
}

// =========================================================================
// Nested element marshalling
// =========================================================================

#[test]
fn test_nested_collection_dependency_is_transitive() {
    let inner = collection(
        CountInfo::CountElement(param("inner_length", 3)),
        CustomTypeMarshallers::default(),
    );
    let outer = collection(
        CountInfo::NoCount,
        CustomTypeMarshallers::single(MarshalMode::ManagedToUnmanagedIn, element_mode(inner)),
    );
    assert_eq!(dependency_names(&outer), vec!["inner_length"]);
}

#[test]
fn test_three_levels_of_nesting() {
    let innermost = collection(
        CountInfo::CountElement(param("depth_two", 4)),
        CustomTypeMarshallers::default(),
    );
    let middle = collection(
        CountInfo::CountElement(param("depth_one", 3)),
        CustomTypeMarshallers::single(MarshalMode::ElementIn, element_mode(innermost)),
    );
    let outer = collection(
        CountInfo::CountElement(param("depth_zero", 2)),
        CustomTypeMarshallers::single(MarshalMode::ManagedToUnmanagedIn, element_mode(middle)),
    );
    assert_eq!(
        dependency_names(&outer),
        vec!["depth_zero", "depth_one", "depth_two"]
    );
}

#[test]
fn test_nested_placeholder_is_skipped() {
    let inner = collection(
        CountInfo::CountElement(placeholder("missing")),
        CustomTypeMarshallers::default(),
    );
    let outer = collection(
        CountInfo::CountElement(param("length", 1)),
        CustomTypeMarshallers::single(MarshalMode::ManagedToUnmanagedIn, element_mode(inner)),
    );
    assert_eq!(dependency_names(&outer), vec!["length"]);
}

#[test]
fn test_order_follows_mode_table_and_keeps_repeats() {
    let shared = param("length", 1);
    let in_element = collection(
        CountInfo::CountElement(shared.clone()),
        CustomTypeMarshallers::default(),
    );
    let out_element = collection(
        CountInfo::CountElement(param("out_length", 5)),
        CustomTypeMarshallers::default(),
    );
    let outer = collection(
        CountInfo::CountElement(shared),
        CustomTypeMarshallers::new([
            (MarshalMode::ManagedToUnmanagedOut, element_mode(out_element)),
            (MarshalMode::ManagedToUnmanagedIn, element_mode(in_element)),
        ]),
    );
    assert_eq!(
        dependency_names(&outer),
        vec!["length", "out_length", "length"]
    );
}

#[test]
fn test_native_only_nested_count_is_live() {
    let native_only = TypePositionInfo::new("native_length", int())
        .with_native_index(SignatureIndex::Param(6));
    let inner = collection(
        CountInfo::CountElement(native_only.clone()),
        CustomTypeMarshallers::default(),
    );
    let outer = collection(
        CountInfo::NoCount,
        CustomTypeMarshallers::single(MarshalMode::ElementOut, element_mode(inner)),
    );
    assert_eq!(outer.dependencies().collect::<Vec<_>>(), vec![&native_only]);
}

// =========================================================================
// Value semantics
// =========================================================================

#[test]
fn test_singletons_are_equal_by_value() {
    assert_eq!(MarshallingInfo::NoMarshalling, MarshallingInfo::NoMarshalling);
    assert_eq!(
        MarshallingInfo::UnmanagedBlittable { is_strictly_blittable: true },
        MarshallingInfo::UnmanagedBlittable { is_strictly_blittable: true }
    );
    assert_ne!(
        MarshallingInfo::UnmanagedBlittable { is_strictly_blittable: true },
        MarshallingInfo::UnmanagedBlittable { is_strictly_blittable: false }
    );
}

#[test]
fn test_infos_work_as_set_members() {
    let build = || {
        collection(
            CountInfo::CountElement(param("length", 1)),
            CustomTypeMarshallers::single(
                MarshalMode::ManagedToUnmanagedIn,
                element_mode(MarshallingInfo::UnmanagedBlittable { is_strictly_blittable: true }),
            ),
        )
    };

    let mut set = FxHashSet::default();
    set.insert(MarshallingInfo::NoMarshalling);
    set.insert(MarshallingInfo::NoMarshalling);
    set.insert(build());
    set.insert(build());
    assert_eq!(set.len(), 2);
}

#[test]
fn test_mode_table_reads_back_unchanged() {
    let table = CustomTypeMarshallers::new([
        (
            MarshalMode::ManagedToUnmanagedOut,
            element_mode(MarshallingInfo::NoMarshalling),
        ),
        (
            MarshalMode::Default,
            element_mode(MarshallingInfo::UnmanagedBlittable { is_strictly_blittable: false }),
        ),
        (
            MarshalMode::ManagedToUnmanagedIn,
            element_mode(MarshallingInfo::NoMarshalling),
        ),
    ]);
    let info = collection(CountInfo::NoCount, table.clone());

    let read_back = info
        .as_linear_collection()
        .map(LinearCollectionMarshallingInfo::marshallers)
        .expect("collection marshalling");
    assert_eq!(read_back, &table);
    assert_eq!(
        read_back.modes().keys().copied().collect::<Vec<_>>(),
        vec![
            MarshalMode::ManagedToUnmanagedOut,
            MarshalMode::Default,
            MarshalMode::ManagedToUnmanagedIn,
        ]
    );
}

#[test]
fn test_insertion_order_does_not_affect_equality() {
    let in_mode = element_mode(MarshallingInfo::NoMarshalling);
    let out_mode = element_mode(MarshallingInfo::UnmanagedBlittable { is_strictly_blittable: true });
    let forward = collection(
        CountInfo::NoCount,
        CustomTypeMarshallers::new([
            (MarshalMode::ManagedToUnmanagedIn, in_mode.clone()),
            (MarshalMode::ManagedToUnmanagedOut, out_mode.clone()),
        ]),
    );
    let reversed = collection(
        CountInfo::NoCount,
        CustomTypeMarshallers::new([
            (MarshalMode::ManagedToUnmanagedOut, out_mode),
            (MarshalMode::ManagedToUnmanagedIn, in_mode),
        ]),
    );
    assert_eq!(forward, reversed);

    let mut set = FxHashSet::default();
    set.insert(forward);
    set.insert(reversed);
    assert_eq!(set.len(), 1);
}
