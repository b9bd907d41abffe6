
use fixtures::*;

use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use vtpool::objects::{AlarmMaskPriority, ContainerAttribute, DataMaskAttribute, KeyAttribute};
use vtpool::{
    AttributeError, AttributeValue, ChildMacros, ChildObjects, ChildPosition, DecodeError,
    DuplicatePolicy, MemoryDiagnostics, NULL_OBJECT_ID, ObjectError, ObjectPool, ObjectType,
    PoolSettings, Selectable, Severity,
};

#[test]
fn test_decodes_working_set_fields() {
    ensure_env_logger_initialized();
    let pool = ObjectPool::from_buffer(&WORKING_SET).unwrap();

    let ws = pool.get_object(0xABCD).and_then(|o| o.as_working_set()).unwrap();
    assert_eq!(ws.background_colour(), 2);
    assert!(ws.is_selectable());
    assert_eq!(ws.active_mask(), 0x03E8);
    assert_eq!(ws.child_objects().len(), 1);
    assert_eq!(ws.child_objects()[&0x2AF8], ChildPosition::new(0, 0));
    assert!(ws.child_macros().is_empty());
    assert_eq!(ws.child_languages(), ["en", "de"]);
}

#[test]
fn test_decodes_every_supported_kind() {
    ensure_env_logger_initialized();
    let pool = ObjectPool::from_buffer(&complete_pool()).unwrap();
    assert_eq!(pool.len(), 8);

    let mut kinds: Vec<(u16, ObjectType)> = pool
        .iter()
        .map(|o| (o.object_id(), o.object_type()))
        .collect();
    kinds.sort();
    assert_eq!(
        kinds,
        vec![
            (0x0000, ObjectType::WorkingSet),
            (0x03E8, ObjectType::DataMask),
            (0x03E9, ObjectType::AlarmMask),
            (0x0FA0, ObjectType::SoftKeyMask),
            (0x1388, ObjectType::Container),
            (0x1389, ObjectType::Container),
            (0x1770, ObjectType::Key),
            (0x1771, ObjectType::Key),
        ]
    );

    let alarm = pool.get_object(0x03E9).unwrap().as_alarm_mask().unwrap();
    assert_eq!(alarm.alarm_priority(), Some(AlarmMaskPriority::High));
    assert_eq!(alarm.acoustic_signal(), 3);

    let soft_keys = pool.get_object(0x0FA0).unwrap().as_soft_key_mask().unwrap();
    assert_eq!(soft_keys.child_objects(), [0x1770, 0x1771]);

    let key = pool.get_object(0x1771).unwrap();
    assert_eq!(key.child_macros(), [0x2711]);
    assert_eq!(key.as_key().unwrap().key_code(), 2);
}

#[test]
fn test_navigates_from_working_set_to_keys() {
    let pool = ObjectPool::from_buffer(&complete_pool()).unwrap();

    let mask = pool.active_mask().unwrap();
    assert_eq!(mask.object_id(), 0x03E8);

    let soft_key_mask_id = mask.as_data_mask().unwrap().soft_key_mask();
    let soft_keys = pool.resolve(mask, soft_key_mask_id).unwrap();

    let codes: Vec<u8> = soft_keys
        .as_soft_key_mask()
        .unwrap()
        .child_objects()
        .iter()
        .filter_map(|&id| pool.resolve(soft_keys, id))
        .filter_map(|key| key.as_key())
        .map(|key| key.key_code())
        .collect();
    assert_eq!(codes, vec![1, 2]);

    // Macro ids are references too, but macros are not decoded here.
    let sink = Arc::new(MemoryDiagnostics::new());
    let pool = ObjectPool::from_buffer(&complete_pool())
        .unwrap()
        .with_diagnostics(sink.clone());
    let mask = pool.get_object(0x03E8).unwrap();
    assert!(pool.resolve(mask, mask.child_macros()[0]).is_none());
    assert!(pool.resolve(mask, NULL_OBJECT_ID).is_none());
    assert_eq!(sink.count(Severity::Error), 1);
}

#[test]
fn test_two_working_sets_decode_into_two_entries() {
    let mut second = WORKING_SET;
    second[..2].copy_from_slice(&0xEF00_u16.to_le_bytes());
    let bytes = PoolBuilder::new().raw(&WORKING_SET).raw(&second).build();

    let pool = ObjectPool::from_buffer(&bytes).unwrap();
    assert_eq!(pool.len(), 2);
    assert!(pool.contains(0xABCD));
    assert!(pool.contains(0xEF00));
}

#[test]
fn test_every_proper_prefix_of_a_complete_pool_is_rejected_or_a_smaller_pool() {
    let bytes = complete_pool();
    let full = ObjectPool::from_buffer(&bytes).unwrap();

    for end in 0..bytes.len() {
        match ObjectPool::from_buffer(&bytes[..end]) {
            Ok(pool) => {
                // Only possible when the cut lands exactly on an object boundary.
                assert!(pool.len() < full.len(), "prefix of {end} bytes");
                assert_ne!(pool.fingerprint(), full.fingerprint());
            }
            Err(_) => {}
        }
    }
}

#[test]
fn test_failed_decode_reports_once_and_keeps_earlier_objects() {
    let bytes = PoolBuilder::new()
        .raw(&WORKING_SET)
        .data_mask(0x0001, 0, NULL_OBJECT_ID, &[], &[])
        .raw(&[0x02, 0x00, 0x2D])
        .build();

    let sink = Arc::new(MemoryDiagnostics::new());
    let mut pool = ObjectPool::new().with_diagnostics(sink.clone());
    let err = pool.decode(&bytes).unwrap_err();

    assert_eq!(err, DecodeError::UnknownObjectType { tag: 0x2D, offset: 28 });
    assert_eq!(pool.len(), 2);
    assert_eq!(pool.fingerprint(), None);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].0, Severity::Error);
    assert!(records[0].1.contains("unknown object type"));
}

#[test]
fn test_section_overrun_in_a_later_object() {
    // Declares three children but carries only one.
    let mut bytes = PoolBuilder::new()
        .raw(&WORKING_SET)
        .container(0x0002, 1, 1, false, &[(0x0003, 0, 0)], &[])
        .build();
    bytes[20 + 8] = 3;

    assert_eq!(
        ObjectPool::from_buffer(&bytes).unwrap_err(),
        DecodeError::SectionOverrun {
            object_id: 0x0002,
            offset: 20,
            need: 18,
            have: 6
        }
    );
}

#[test]
fn test_reparse_yields_identical_pools() {
    let bytes = complete_pool();
    let first = ObjectPool::from_buffer(&bytes).unwrap();
    let second = ObjectPool::from_buffer(&bytes).unwrap();

    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
    for object in first.iter() {
        assert_eq!(Some(object), second.get_object(object.object_id()));
    }
}

#[test]
fn test_json_dump_is_byte_stable_across_decodes() {
    let children: Vec<Child> = (0..20).map(|i| (0x2000 - i, i as i16, 0)).collect();
    let bytes = PoolBuilder::new()
        .raw(&WORKING_SET)
        .data_mask(0x03E8, 0, NULL_OBJECT_ID, &children, &[])
        .build();

    let expected = serde_json::to_string(&ObjectPool::from_buffer(&bytes).unwrap()).unwrap();
    for _ in 0..20 {
        let pool = ObjectPool::from_buffer(&bytes).unwrap();
        assert_eq!(serde_json::to_string(&pool).unwrap(), expected);
    }

    let value: serde_json::Value = serde_json::from_str(&expected).unwrap();
    let keys: Vec<u16> = value["objects"][0]["children"]
        .as_object()
        .unwrap()
        .keys()
        .map(|key| key.parse().unwrap())
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys.len(), 20);
    assert_eq!(keys, sorted);
}

#[test]
fn test_duplicate_policy() {
    let bytes = PoolBuilder::new()
        .key(0x0010, 1, 1, &[], &[])
        .key(0x0010, 1, 9, &[], &[])
        .build();

    let pool = ObjectPool::from_buffer(&bytes).unwrap();
    assert_eq!(pool.get_object(0x0010).unwrap().as_key().unwrap().key_code(), 9);

    let mut strict =
        ObjectPool::with_settings(PoolSettings::new().duplicate_ids(DuplicatePolicy::Reject));
    assert!(matches!(
        strict.decode(&bytes),
        Err(DecodeError::DuplicateObjectId { object_id: 0x0010, .. })
    ));
}

#[test]
fn test_attribute_change_notifies_exactly_once() {
    let mut pool = ObjectPool::from_buffer(&complete_pool()).unwrap();
    let mask = pool.get_object_mut(0x03E8).unwrap();

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    mask.register_update_callback(move |id| {
        assert_eq!(id, 0x03E8);
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let bg = DataMaskAttribute::BackgroundColour.id();
    mask.change_attribute(bg, AttributeValue::Uint8(5)).unwrap();
    assert_eq!(mask.get_attribute(bg), Ok(AttributeValue::Uint8(5)));
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    assert!(matches!(
        mask.change_attribute(bg, AttributeValue::Uint16(5)),
        Err(AttributeError::TypeMismatch { .. })
    ));
    assert_eq!(mask.get_attribute(bg), Ok(AttributeValue::Uint8(5)));
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn test_working_set_rejects_generic_changes() {
    let sink = Arc::new(MemoryDiagnostics::new());
    let mut pool = ObjectPool::from_buffer(&complete_pool())
        .unwrap()
        .with_diagnostics(sink.clone());
    let ws = pool.get_object_mut(0x0000).unwrap();

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    ws.register_update_callback(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    for (attribute, value) in [
        (0, AttributeValue::Uint8(0)),
        (1, AttributeValue::Uint8(3)),
        (2, AttributeValue::Boolean(false)),
        (3, AttributeValue::Uint16(0x03E9)),
    ] {
        assert!(ws.change_attribute(attribute, value).is_err());
    }
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert_eq!(sink.count(Severity::Error), 4);

    ws.as_working_set_mut().unwrap().change_active_mask(0x03E9);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert_eq!(pool.active_mask().unwrap().object_type(), ObjectType::AlarmMask);
}

#[test]
fn test_child_topology_mutation() {
    let sink = Arc::new(MemoryDiagnostics::new());
    let mut pool = ObjectPool::from_buffer(&complete_pool())
        .unwrap()
        .with_diagnostics(sink.clone());

    let mask = pool.get_object_mut(0x03E8).unwrap();
    mask.change_child_position(0x1388, 1, 2).unwrap();
    mask.change_child_location(0x1389, i16::MAX, 3).unwrap();
    mask.change_child_location(0x1389, 100, 0).unwrap();
    assert_eq!(
        mask.change_child_location(0x0FA0, 1, 1),
        Err(ObjectError::ChildNotFound {
            parent: 0x03E8,
            child: 0x0FA0
        })
    );

    let children = mask.child_objects().unwrap();
    assert_eq!(children[&0x1388], ChildPosition::new(1, 2));
    assert_eq!(children[&0x1389], ChildPosition::new(i16::MAX, 3));

    let soft_keys = pool.get_object_mut(0x0FA0).unwrap();
    assert_eq!(
        soft_keys.change_child_position(0x1770, 0, 0),
        Err(ObjectError::NoChildObjects {
            object_id: 0x0FA0,
            object_type: ObjectType::SoftKeyMask
        })
    );

    assert_eq!(sink.count(Severity::Error), 2);
}

#[test]
fn test_container_and_key_mutation() {
    let mut pool = ObjectPool::from_buffer(&complete_pool()).unwrap();

    let container = pool.get_object_mut(0x1389).unwrap();
    container
        .change_attribute(ContainerAttribute::Hidden.id(), AttributeValue::Boolean(false))
        .unwrap();
    let container = container.as_container_mut().unwrap();
    container.change_size(64, 32);
    assert!(!container.is_hidden());
    assert_eq!((container.width(), container.height()), (64, 32));

    let events = Arc::new(Mutex::new(Vec::new()));
    let key = pool.get_object_mut(0x1770).unwrap().as_key_mut().unwrap();
    let seen = Arc::clone(&events);
    key.register_select_callback(move |id| seen.lock().unwrap().push(id));
    key.select();
    key.change_background_colour(9);

    assert!(key.is_selected());
    assert_eq!(
        pool.get_object(0x1770)
            .unwrap()
            .get_attribute(KeyAttribute::BackgroundColour.id()),
        Ok(AttributeValue::Uint8(9))
    );
    assert_eq!(*events.lock().unwrap(), vec![0x1770]);
}

#[test]
fn test_json_dump_shape() {
    let pool = ObjectPool::from_buffer(&WORKING_SET).unwrap();
    let value = serde_json::to_value(&pool).unwrap();

    assert_eq!(value["version"], serde_json::json!(pool.fingerprint().unwrap()));
    let ws = &value["objects"][0];
    assert_eq!(ws["type"], "WorkingSet");
    assert_eq!(ws["id"], 0xABCD);
    assert_eq!(ws["active_mask"], 0x03E8);
    assert_eq!(ws["languages"], serde_json::json!(["en", "de"]));
    assert_eq!(ws["children"]["11000"], serde_json::json!({"x": 0, "y": 0}));
}
