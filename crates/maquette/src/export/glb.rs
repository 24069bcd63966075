//! Binary glTF 2.0 scene serialization.
//!
//! The container is assembled by hand: a 12-byte header, a JSON chunk
//! describing the scene, and a binary chunk holding vertex and index
//! buffers. Every room solid becomes one mesh and one node; materials are
//! shared per room type and carry the plan palette as base colors.
//!
//! Chunk payloads are 4-byte aligned as the format requires: the JSON chunk
//! pads with spaces, the binary chunk with zeros. The JSON chunk is built
//! from typed structs so field order, and with it the byte stream, is fixed.

use serde::Serialize;

use maquette_core::program::RoomType;

use crate::{export::Error, extrude::RoomSolid};

const GLB_MAGIC: u32 = 0x4654_6C67;
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

/// glTF componentType for f32.
const COMPONENT_F32: u32 = 5126;
/// glTF componentType for u32.
const COMPONENT_U32: u32 = 5125;
/// bufferView target for vertex attributes.
const TARGET_ARRAY_BUFFER: u32 = 34962;
/// bufferView target for indices.
const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;

#[derive(Serialize)]
struct GltfDocument {
    asset: GltfAsset,
    scene: u32,
    scenes: Vec<GltfScene>,
    nodes: Vec<GltfNode>,
    meshes: Vec<GltfMesh>,
    materials: Vec<GltfMaterial>,
    accessors: Vec<GltfAccessor>,
    #[serde(rename = "bufferViews")]
    buffer_views: Vec<GltfBufferView>,
    buffers: Vec<GltfBuffer>,
}

#[derive(Serialize)]
struct GltfAsset {
    version: &'static str,
    generator: &'static str,
}

#[derive(Serialize)]
struct GltfScene {
    nodes: Vec<u32>,
}

#[derive(Serialize)]
struct GltfNode {
    name: String,
    mesh: u32,
}

#[derive(Serialize)]
struct GltfMesh {
    primitives: Vec<GltfPrimitive>,
}

#[derive(Serialize)]
struct GltfPrimitive {
    attributes: GltfAttributes,
    indices: u32,
    material: u32,
}

#[derive(Serialize)]
struct GltfAttributes {
    #[serde(rename = "POSITION")]
    position: u32,
}

#[derive(Serialize)]
struct GltfMaterial {
    name: &'static str,
    #[serde(rename = "pbrMetallicRoughness")]
    pbr: GltfPbr,
}

#[derive(Serialize)]
struct GltfPbr {
    #[serde(rename = "baseColorFactor")]
    base_color_factor: [f32; 4],
    #[serde(rename = "metallicFactor")]
    metallic_factor: f32,
}

#[derive(Serialize)]
struct GltfAccessor {
    #[serde(rename = "bufferView")]
    buffer_view: u32,
    #[serde(rename = "componentType")]
    component_type: u32,
    count: u32,
    #[serde(rename = "type")]
    element_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<[f32; 3]>,
}

#[derive(Serialize)]
struct GltfBufferView {
    buffer: u32,
    #[serde(rename = "byteOffset")]
    byte_offset: u32,
    #[serde(rename = "byteLength")]
    byte_length: u32,
    target: u32,
}

#[derive(Serialize)]
struct GltfBuffer {
    #[serde(rename = "byteLength")]
    byte_length: u32,
}

/// Encodes room solids as a self-contained binary glTF scene.
///
/// Solids keep their order: node `i` carries mesh `i` for room `i`.
///
/// # Errors
///
/// Returns [`Error::Serialize`] if the JSON chunk cannot be serialized.
pub fn encode_scene(solids: &[RoomSolid]) -> Result<Vec<u8>, Error> {
    let mut binary: Vec<u8> = Vec::new();
    let mut nodes = Vec::new();
    let mut meshes = Vec::new();
    let mut accessors = Vec::new();
    let mut buffer_views = Vec::new();

    // Materials are shared per room type, created on first use.
    let mut materials: Vec<GltfMaterial> = Vec::new();
    let mut material_of_type: [Option<u32>; RoomType::ALL.len()] = [None; RoomType::ALL.len()];

    for (index, solid) in solids.iter().enumerate() {
        let mesh = solid.mesh();

        let material = *material_of_type[solid.room_type().index()].get_or_insert_with(|| {
            materials.push(GltfMaterial {
                name: solid.room_type().into(),
                pbr: GltfPbr {
                    base_color_factor: solid.room_type().fill_color().to_rgba(),
                    metallic_factor: 0.0,
                },
            });
            materials.len() as u32 - 1
        });

        let position_offset = binary.len() as u32;
        for position in mesh.positions() {
            for component in position {
                binary.extend_from_slice(&component.to_le_bytes());
            }
        }
        let position_length = binary.len() as u32 - position_offset;

        let index_offset = binary.len() as u32;
        for value in mesh.indices() {
            binary.extend_from_slice(&value.to_le_bytes());
        }
        let index_length = binary.len() as u32 - index_offset;

        let position_view = buffer_views.len() as u32;
        buffer_views.push(GltfBufferView {
            buffer: 0,
            byte_offset: position_offset,
            byte_length: position_length,
            target: TARGET_ARRAY_BUFFER,
        });
        let index_view = buffer_views.len() as u32;
        buffer_views.push(GltfBufferView {
            buffer: 0,
            byte_offset: index_offset,
            byte_length: index_length,
            target: TARGET_ELEMENT_ARRAY_BUFFER,
        });

        let (min, max) = mesh.position_bounds();
        let position_accessor = accessors.len() as u32;
        accessors.push(GltfAccessor {
            buffer_view: position_view,
            component_type: COMPONENT_F32,
            count: mesh.vertex_count() as u32,
            element_type: "VEC3",
            min: Some(min),
            max: Some(max),
        });
        let index_accessor = accessors.len() as u32;
        accessors.push(GltfAccessor {
            buffer_view: index_view,
            component_type: COMPONENT_U32,
            count: mesh.indices().len() as u32,
            element_type: "SCALAR",
            min: None,
            max: None,
        });

        meshes.push(GltfMesh {
            primitives: vec![GltfPrimitive {
                attributes: GltfAttributes {
                    position: position_accessor,
                },
                indices: index_accessor,
                material,
            }],
        });
        nodes.push(GltfNode {
            name: solid.name().to_string(),
            mesh: index as u32,
        });
    }

    let document = GltfDocument {
        asset: GltfAsset {
            version: "2.0",
            generator: "maquette",
        },
        scene: 0,
        scenes: vec![GltfScene {
            nodes: (0..nodes.len() as u32).collect(),
        }],
        nodes,
        meshes,
        materials,
        accessors,
        buffer_views,
        buffers: vec![GltfBuffer {
            byte_length: binary.len() as u32,
        }],
    };

    let json = serde_json::to_vec(&document).map_err(Error::Serialize)?;
    Ok(assemble(&json, &binary))
}

/// Packs the JSON and binary payloads into the two-chunk GLB container.
fn assemble(json: &[u8], binary: &[u8]) -> Vec<u8> {
    let json_padding = padding(json.len());
    let binary_padding = padding(binary.len());
    let total = 12
        + 8
        + json.len()
        + json_padding
        + 8
        + binary.len()
        + binary_padding;

    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&(total as u32).to_le_bytes());

    glb.extend_from_slice(&((json.len() + json_padding) as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(json);
    glb.extend(std::iter::repeat_n(b' ', json_padding));

    glb.extend_from_slice(&((binary.len() + binary_padding) as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    glb.extend_from_slice(binary);
    glb.extend(std::iter::repeat_n(0u8, binary_padding));

    glb
}

fn padding(length: usize) -> usize {
    (4 - length % 4) % 4
}

#[cfg(test)]
mod tests {
    use super::*;

    use maquette_core::{
        identifier::RoomId,
        program::{ArchitecturalProgram, RoomRequirement},
    };

    use crate::{
        config::{ExportConfig, GraphConfig, ResolverConfig},
        extrude::extrude_layout,
        graph::ConstraintGraph,
        resolve::resolve_layout,
        synthesis::RawRoomVector,
    };

    fn solids() -> Vec<RoomSolid> {
        let program = ArchitecturalProgram::new(vec![
            RoomRequirement::new(RoomId::new("bedroom"), RoomType::Bedroom),
            RoomRequirement::new(RoomId::new("bedroom_annex"), RoomType::Bedroom),
            RoomRequirement::new(RoomId::new("kitchen"), RoomType::Kitchen),
        ]);
        let graph = ConstraintGraph::from_program(&program, &GraphConfig::default()).unwrap();
        let raw = vec![
            RawRoomVector::new(0.0, 0.0, 3.5, 3.5, 0.0),
            RawRoomVector::new(8.0, 0.0, 3.5, 3.5, 0.0),
            RawRoomVector::new(0.0, 8.0, 3.2, 3.2, 0.0),
        ];
        let (layout, _) = resolve_layout(&graph, &raw, None, &ResolverConfig::default()).unwrap();
        extrude_layout(&layout, &ExportConfig::default()).unwrap()
    }

    fn read_u32(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_header_and_chunk_layout() {
        let glb = encode_scene(&solids()).unwrap();

        assert_eq!(read_u32(&glb, 0), GLB_MAGIC);
        assert_eq!(read_u32(&glb, 4), GLB_VERSION);
        assert_eq!(read_u32(&glb, 8) as usize, glb.len());

        let json_length = read_u32(&glb, 12) as usize;
        assert_eq!(json_length % 4, 0);
        assert_eq!(read_u32(&glb, 16), CHUNK_JSON);

        let bin_start = 20 + json_length;
        let bin_length = read_u32(&glb, bin_start) as usize;
        assert_eq!(bin_length % 4, 0);
        assert_eq!(read_u32(&glb, bin_start + 4), CHUNK_BIN);
        assert_eq!(glb.len(), bin_start + 8 + bin_length);
    }

    #[test]
    fn test_json_chunk_describes_every_room() {
        let glb = encode_scene(&solids()).unwrap();
        let json_length = read_u32(&glb, 12) as usize;
        let document: serde_json::Value =
            serde_json::from_slice(&glb[20..20 + json_length]).unwrap();

        assert_eq!(document["asset"]["version"], "2.0");
        assert_eq!(document["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(document["meshes"].as_array().unwrap().len(), 3);
        // Two bedrooms share a material, the kitchen gets its own.
        assert_eq!(document["materials"].as_array().unwrap().len(), 2);
        assert_eq!(document["materials"][0]["name"], "bedroom");

        // Position accessors carry their bounds.
        let accessor = &document["accessors"][0];
        assert_eq!(accessor["type"], "VEC3");
        assert!(accessor["min"].is_array());
        assert!(accessor["max"].is_array());
    }

    #[test]
    fn test_buffer_views_cover_the_binary_chunk() {
        let glb = encode_scene(&solids()).unwrap();
        let json_length = read_u32(&glb, 12) as usize;
        let document: serde_json::Value =
            serde_json::from_slice(&glb[20..20 + json_length]).unwrap();

        let declared = document["buffers"][0]["byteLength"].as_u64().unwrap();
        let views = document["bufferViews"].as_array().unwrap();
        let covered: u64 = views
            .iter()
            .map(|view| view["byteLength"].as_u64().unwrap())
            .sum();
        assert_eq!(covered, declared);

        let last = views.last().unwrap();
        assert_eq!(
            last["byteOffset"].as_u64().unwrap() + last["byteLength"].as_u64().unwrap(),
            declared
        );
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let solids = solids();
        assert_eq!(encode_scene(&solids).unwrap(), encode_scene(&solids).unwrap());
    }
}
