//! Building-model export as an IFC STEP physical file.
//!
//! The file carries the canonical spatial hierarchy: project, site,
//! building, one storey, and one space per room. Each space is tagged with
//! the room's name and type and references a rectangular solid extruded
//! from the room footprint to the configured wall height.
//!
//! Output is deterministic: entity numbers follow room order, global ids
//! derive from the room ids, and the header carries no timestamps.

use crate::{config::ExportConfig, resolve::Layout};

/// The 64-character alphabet of compressed IFC global ids.
const GUID_ALPHABET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Renders a layout as an IFC4 STEP file.
///
/// The same layout renders to byte-identical text on every call.
pub fn render_model(layout: &Layout, config: &ExportConfig) -> String {
    let mut data = String::new();
    let mut next_id = 1u32;
    let mut entity = |data: &mut String, body: String| -> u32 {
        let id = next_id;
        next_id += 1;
        data.push_str(&format!("#{id}={body};\n"));
        id
    };

    let project = entity(
        &mut data,
        format!(
            "IFCPROJECT('{}',$,'Layout',$,$,$,$,$,$)",
            global_id("project")
        ),
    );
    let site = entity(
        &mut data,
        format!(
            "IFCSITE('{}',$,'Site',$,$,$,$,$,$,$,$,$,$,$)",
            global_id("site")
        ),
    );
    let building = entity(
        &mut data,
        format!(
            "IFCBUILDING('{}',$,'Building',$,$,$,$,$,$,$,$,$)",
            global_id("building")
        ),
    );
    let storey = entity(
        &mut data,
        format!(
            "IFCBUILDINGSTOREY('{}',$,'Storey',$,$,$,$,$,$,0.)",
            global_id("storey")
        ),
    );
    entity(
        &mut data,
        format!(
            "IFCRELAGGREGATES('{}',$,$,$,#{project},(#{site}))",
            global_id("project-site")
        ),
    );
    entity(
        &mut data,
        format!(
            "IFCRELAGGREGATES('{}',$,$,$,#{site},(#{building}))",
            global_id("site-building")
        ),
    );
    entity(
        &mut data,
        format!(
            "IFCRELAGGREGATES('{}',$,$,$,#{building},(#{storey}))",
            global_id("building-storey")
        ),
    );
    let up = entity(&mut data, "IFCDIRECTION((0.,0.,1.))".to_string());

    let mut spaces = Vec::new();
    for room in layout.rooms() {
        let center = room.center();
        let point = entity(
            &mut data,
            format!(
                "IFCCARTESIANPOINT(({:.3},{:.3}))",
                center.x(),
                center.y()
            ),
        );
        let placement = entity(&mut data, format!("IFCAXIS2PLACEMENT2D(#{point},$)"));
        let profile = entity(
            &mut data,
            format!(
                "IFCRECTANGLEPROFILEDEF(.AREA.,'{}',#{placement},{:.3},{:.3})",
                room.id(),
                room.width(),
                room.height()
            ),
        );
        let solid = entity(
            &mut data,
            format!(
                "IFCEXTRUDEDAREASOLID(#{profile},$,#{up},{:.3})",
                config.wall_height()
            ),
        );
        let space = entity(
            &mut data,
            format!(
                "IFCSPACE('{}',$,'{}',$,'{}',$,#{solid},$,.ELEMENT.,$,$)",
                global_id(&format!("space-{}", room.id())),
                room.name(),
                <&'static str>::from(room.room_type())
            ),
        );
        spaces.push(space);
    }

    let space_refs: Vec<String> = spaces.iter().map(|id| format!("#{id}")).collect();
    entity(
        &mut data,
        format!(
            "IFCRELAGGREGATES('{}',$,$,$,#{storey},({}))",
            global_id("storey-spaces"),
            space_refs.join(",")
        ),
    );

    let mut file = String::new();
    file.push_str("ISO-10303-21;\n");
    file.push_str("HEADER;\n");
    file.push_str("FILE_DESCRIPTION(('Maquette layout'),'2;1');\n");
    file.push_str("FILE_NAME('layout.ifc','',(''),(''),'maquette','','');\n");
    file.push_str("FILE_SCHEMA(('IFC4'));\n");
    file.push_str("ENDSEC;\n");
    file.push_str("DATA;\n");
    file.push_str(&data);
    file.push_str("ENDSEC;\n");
    file.push_str("END-ISO-10303-21;\n");
    file
}

/// Derives a compressed 22-character IFC global id from a seed string.
///
/// Two chained FNV-1a rounds spread the seed over 128 bits, which then
/// encode into the IFC id alphabet. The same seed always yields the same
/// id, so re-exports keep stable identities.
fn global_id(seed: &str) -> String {
    let high = fnv1a(seed.as_bytes(), FNV_OFFSET);
    let low = fnv1a(&high.to_le_bytes(), high);
    let bits = (u128::from(high) << 64) | u128::from(low);

    let mut id = String::with_capacity(22);
    // The leading character carries the top 2 bits, the rest 6 bits each.
    id.push(GUID_ALPHABET[(bits >> 126) as usize & 0x3] as char);
    for position in (0..21).rev() {
        id.push(GUID_ALPHABET[(bits >> (position * 6)) as usize & 0x3F] as char);
    }
    id
}

fn fnv1a(bytes: &[u8], basis: u64) -> u64 {
    bytes
        .iter()
        .fold(basis, |hash, &byte| (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME))
}
