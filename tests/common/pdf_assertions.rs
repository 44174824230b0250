#![allow(dead_code)]

use lopdf::content::Operation;
use lopdf::{Dictionary, Document as LopdfDocument, Object};

fn resolve<'a>(doc: &'a LopdfDocument, object: &'a Object) -> Option<&'a Dictionary> {
    match object.as_reference() {
        Ok(id) => doc.get_object(id).ok().and_then(|obj| obj.as_dict().ok()),
        Err(_) => object.as_dict().ok(),
    }
}

/// The `/Font` resource dictionary of the first page.
pub fn font_resources(doc: &LopdfDocument) -> Option<&Dictionary> {
    let pages = doc.get_pages();
    let page = doc.get_dictionary(*pages.get(&1)?).ok()?;
    let resources = resolve(doc, page.get(b"Resources").ok()?)?;
    resolve(doc, resources.get(b"Font").ok()?)
}

/// BaseFont names of every font the first page can use.
pub fn font_names(doc: &LopdfDocument) -> Vec<String> {
    let Some(fonts) = font_resources(doc) else {
        return Vec::new();
    };
    let mut names: Vec<String> = fonts
        .iter()
        .filter_map(|(_, font)| resolve(doc, font))
        .filter_map(|font| font.get(b"BaseFont").ok()?.as_name().ok().map(|n| String::from_utf8_lossy(n).to_string()))
        .collect();
    names.sort();
    names
}

/// The font file stream of an embedded Type0 font named `base_font`.
pub fn embedded_font_program(doc: &LopdfDocument, base_font: &str) -> Option<Vec<u8>> {
    let fonts = font_resources(doc)?;
    for (_, font) in fonts.iter() {
        let font = resolve(doc, font)?;
        if font.get(b"BaseFont").ok()?.as_name().ok()? != base_font.as_bytes() {
            continue;
        }
        let descendants = font.get(b"DescendantFonts").ok()?.as_array().ok()?;
        let cid_font = resolve(doc, descendants.first()?)?;
        let descriptor = resolve(doc, cid_font.get(b"FontDescriptor").ok()?)?;
        let file_id = descriptor.get(b"FontFile2").ok()?.as_reference().ok()?;
        let mut stream = doc.get_object(file_id).ok()?.as_stream().ok()?.clone();
        let _ = stream.decompress();
        return Some(stream.content);
    }
    None
}

pub fn number(object: &Object) -> f64 {
    f64::from(object.as_float().expect("numeric operand"))
}

/// The `Tm` operations in order, as `(x, y)` translations.
pub fn text_positions(ops: &[Operation]) -> Vec<(f64, f64)> {
    ops.iter().filter(|op| op.operator == "Tm").map(|op| (number(&op.operands[4]), number(&op.operands[5]))).collect()
}

/// Index of the first operation with `operator`, panicking when absent.
pub fn position_of(ops: &[Operation], operator: &str) -> usize {
    ops.iter().position(|op| op.operator == operator).unwrap_or_else(|| panic!("no '{}' operation", operator))
}

/// Polygons built from the `m`/`l`/`h` operators before the first fill operator.
pub fn first_filled_polygons(ops: &[Operation]) -> (Vec<Vec<(f64, f64)>>, String) {
    let mut polygons: Vec<Vec<(f64, f64)>> = Vec::new();
    for op in ops {
        match op.operator.as_str() {
            "m" => polygons.push(vec![(number(&op.operands[0]), number(&op.operands[1]))]),
            "l" => {
                if let Some(current) = polygons.last_mut() {
                    current.push((number(&op.operands[0]), number(&op.operands[1])));
                }
            }
            "f" | "f*" | "B" | "B*" => return (polygons, op.operator.clone()),
            _ => {}
        }
    }
    (polygons, String::new())
}

/// Whether `point` is painted by `polygons` under the given fill operator.
pub fn is_painted(polygons: &[Vec<(f64, f64)>], operator: &str, point: (f64, f64)) -> bool {
    let (px, py) = point;
    let mut winding = 0i32;
    let mut crossings = 0u32;
    for polygon in polygons {
        for (i, &(x1, y1)) in polygon.iter().enumerate() {
            let (x2, y2) = polygon[(i + 1) % polygon.len()];
            if (y1 <= py) != (y2 <= py) {
                let x = x1 + (py - y1) / (y2 - y1) * (x2 - x1);
                if x > px {
                    crossings += 1;
                    winding += if y2 > y1 { 1 } else { -1 };
                }
            }
        }
    }
    if operator.ends_with('*') { crossings % 2 == 1 } else { winding != 0 }
}
