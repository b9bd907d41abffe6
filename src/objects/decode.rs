//! Shared pieces of the per-kind decoders: the common header and the count-prefixed sections.

use crate::err::{DecodeError, Result};
use crate::objects::{ChildObjectMap, ChildPosition};
use crate::utils::ByteCursor;
use crate::ObjectId;

/// Child id + signed x + signed y.
pub(crate) const CHILD_OBJECT_ENTRY_SIZE: usize = 6;
/// Bare child id (soft key masks).
pub(crate) const OBJECT_ID_ENTRY_SIZE: usize = 2;
pub(crate) const MACRO_ENTRY_SIZE: usize = 2;
/// Two raw characters, not NUL terminated.
pub(crate) const LANGUAGE_ENTRY_SIZE: usize = 2;

/// Read the 3 byte object header and return the object id.
pub(crate) fn read_header(cursor: &mut ByteCursor<'_>) -> Result<ObjectId> {
    let object_id = cursor.u16_named("object id")?;
    // The pool already dispatched on the type byte.
    let _ = cursor.u8_named("object type")?;
    Ok(object_id)
}

/// Check that every declared-but-unread section fits in what is left of the buffer.
///
/// `sections` holds `(count, entry_size)` pairs. `object_offset` is where the object started.
pub(crate) fn ensure_sections(
    cursor: &ByteCursor<'_>,
    object_id: ObjectId,
    object_offset: u64,
    sections: &[(u8, usize)],
) -> Result<()> {
    let need: usize = sections
        .iter()
        .map(|&(count, entry_size)| usize::from(count) * entry_size)
        .sum();
    let have = cursor.remaining();

    if have < need {
        return Err(DecodeError::SectionOverrun {
            object_id,
            offset: object_offset,
            need,
            have,
        });
    }
    Ok(())
}

pub(crate) fn read_child_objects(
    cursor: &mut ByteCursor<'_>,
    count: u8,
) -> Result<ChildObjectMap> {
    let entries = cursor.read_counted_vec(
        usize::from(count),
        CHILD_OBJECT_ENTRY_SIZE,
        "child objects",
        |c| {
            let id = c.u16_named("child object id")?;
            let x = c.i16_named("child object x")?;
            let y = c.i16_named("child object y")?;
            Ok((id, ChildPosition::new(x, y)))
        },
    )?;

    Ok(entries.into_iter().collect())
}

pub(crate) fn read_object_ids(cursor: &mut ByteCursor<'_>, count: u8) -> Result<Vec<ObjectId>> {
    cursor.read_counted_vec(usize::from(count), OBJECT_ID_ENTRY_SIZE, "child ids", |c| {
        c.u16_named("child object id")
    })
}

pub(crate) fn read_macros(cursor: &mut ByteCursor<'_>, count: u8) -> Result<Vec<ObjectId>> {
    cursor.read_counted_vec(usize::from(count), MACRO_ENTRY_SIZE, "macros", |c| {
        c.u16_named("macro id")
    })
}

pub(crate) fn read_languages(cursor: &mut ByteCursor<'_>, count: u8) -> Result<Vec<String>> {
    cursor.read_counted_vec(usize::from(count), LANGUAGE_ENTRY_SIZE, "languages", |c| {
        let code = c.array::<LANGUAGE_ENTRY_SIZE>("language code")?;
        Ok(code.iter().map(|&b| char::from(b)).collect())
    })
}

/// The `numObjects, numMacros -> children, macros` tail shared by most kinds.
pub(crate) fn read_children_and_macros(
    cursor: &mut ByteCursor<'_>,
    object_id: ObjectId,
    object_offset: u64,
) -> Result<(ChildObjectMap, Vec<ObjectId>)> {
    let num_objects = cursor.u8_named("number of objects")?;
    let num_macros = cursor.u8_named("number of macros")?;

    ensure_sections(
        cursor,
        object_id,
        object_offset,
        &[
            (num_objects, CHILD_OBJECT_ENTRY_SIZE),
            (num_macros, MACRO_ENTRY_SIZE),
        ],
    )?;

    let children = read_child_objects(cursor, num_objects)?;
    let macros = read_macros(cursor, num_macros)?;
    Ok((children, macros))
}
