// Size pass for generated PDFs: FlateDecode unfiltered streams, drop orphans

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Document, Object, ObjectId};

/// Apply FlateDecode to every stream that has no filter yet.
///
/// Streams that already carry a filter (JPEG page images, pre-deflated
/// rasters) are left alone.
pub fn compress_streams(doc: &mut Document) {
    let ids: Vec<ObjectId> = doc.objects.keys().copied().collect();

    for id in ids {
        let needs_compression = {
            let Some(Object::Stream(stream)) = doc.objects.get(&id) else {
                continue;
            };
            stream.dict.get(b"Filter").is_err()
        };

        if needs_compression {
            let Some(Object::Stream(stream)) = doc.objects.get_mut(&id) else {
                continue;
            };

            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
            if encoder.write_all(&stream.content).is_err() {
                continue;
            }
            let Ok(compressed) = encoder.finish() else {
                continue;
            };

            // Tiny streams can grow under deflate.
            if compressed.len() >= stream.content.len() {
                continue;
            }
            stream.dict.set("Filter", "FlateDecode");
            stream.set_content(compressed);
        }
    }
}

/// Remove objects nothing references.
pub fn delete_unused_objects(doc: &mut Document) {
    doc.prune_objects();
}

/// Run all size passes in order.
pub fn optimize(doc: &mut Document) {
    compress_streams(doc);
    delete_unused_objects(doc);
}
