/// Wavefront OBJ loader.
///
/// Reads positions (`v`), texture coordinates (`vt`) and faces (`f`). Every
/// index is checked against the data defined before it, so the resulting
/// mesh never references a missing vertex.
use std::fs;
use std::path::Path;

use nalgebra::{Vector2, Vector3};
use nom::{
    character::complete::{char, i64 as integer, space0, space1},
    combinator::{all_consuming, opt},
    multi::separated_list1,
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;

use crate::color;
use crate::geometry::{Face, Mesh};

#[derive(Error, Debug)]
pub enum ObjError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: {kind} index {index} is out of range ({len} defined)")]
    IndexOutOfRange {
        line: usize,
        kind: &'static str,
        index: i64,
        len: usize,
    },

    #[error("line {line}: OBJ indices start at 1")]
    ZeroIndex { line: usize },
}

/// One corner of an `f` statement, as written in the file.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VertexRef {
    position: i64,
    texcoord: Option<i64>,
}

/// Load and parse an OBJ file.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    let mesh = parse_obj(&source)?;
    log::info!(
        "loaded {:?}: {} vertices, {} faces",
        path,
        mesh.vertices.len(),
        mesh.faces.len()
    );
    Ok(mesh)
}

/// Parse OBJ source text into a mesh.
///
/// Polygons are fan-triangulated around their first corner. Texture `v` is
/// flipped so that `v = 0` addresses the top texture row. All faces are
/// white.
pub fn parse_obj(source: &str) -> Result<Mesh, ObjError> {
    let mut mesh = Mesh::new();
    let mut texcoords: Vec<Vector2<f32>> = Vec::new();

    for (number, raw) in source.lines().enumerate() {
        let line = number + 1;
        let statement = raw.split('#').next().unwrap_or_default().trim();
        if statement.is_empty() {
            continue;
        }
        let (keyword, args) = statement
            .split_once(char::is_whitespace)
            .unwrap_or((statement, ""));
        let args = args.trim_start();

        match keyword {
            "v" => {
                let position = parse_args(position_args, keyword, args, line)?;
                mesh.add_vertex(position);
            }
            "vt" => {
                let uv = parse_args(texcoord_args, keyword, args, line)?;
                texcoords.push(Vector2::new(uv.x, 1.0 - uv.y));
            }
            "f" => {
                let refs = parse_args(face_args, keyword, args, line)?;
                if refs.len() < 3 {
                    return Err(ObjError::Parse {
                        line,
                        message: format!("face has {} corners, needs at least 3", refs.len()),
                    });
                }

                let mut corners = Vec::with_capacity(refs.len());
                for r in &refs {
                    let index = resolve(r.position, mesh.vertices.len(), line, "vertex")?;
                    let uv = match r.texcoord {
                        Some(t) => texcoords[resolve(t, texcoords.len(), line, "texture coordinate")?],
                        None => Vector2::zeros(),
                    };
                    corners.push((index, uv));
                }

                let (first, first_uv) = corners[0];
                for pair in corners[1..].windows(2) {
                    let [(b, b_uv), (c, c_uv)] = [pair[0], pair[1]];
                    mesh.add_face(Face::new(first, b, c, [first_uv, b_uv, c_uv], color::WHITE));
                }
            }
            other => log::debug!("line {}: skipping `{}` statement", line, other),
        }
    }

    Ok(mesh)
}

/// Turns a 1-based or negative (relative) OBJ index into a 0-based one.
fn resolve(index: i64, len: usize, line: usize, kind: &'static str) -> Result<usize, ObjError> {
    let resolved = match index {
        0 => return Err(ObjError::ZeroIndex { line }),
        i if i > 0 => i - 1,
        i => len as i64 + i,
    };
    if resolved < 0 || resolved >= len as i64 {
        return Err(ObjError::IndexOutOfRange {
            line,
            kind,
            index,
            len,
        });
    }
    Ok(resolved as usize)
}

fn parse_args<'a, T>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, T>,
    keyword: &str,
    args: &'a str,
    line: usize,
) -> Result<T, ObjError> {
    all_consuming(terminated(parser, space0))(args)
        .map(|(_, value)| value)
        .map_err(|e| ObjError::Parse {
            line,
            message: format!("malformed `{}` statement: {}", keyword, e),
        })
}

fn position_args(input: &str) -> IResult<&str, Vector3<f32>> {
    let (input, (x, y, z)) =
        tuple((float, preceded(space1, float), preceded(space1, float)))(input)?;
    // Optional weight, unused.
    let (input, _) = opt(preceded(space1, float))(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn texcoord_args(input: &str) -> IResult<&str, Vector2<f32>> {
    let (input, u) = float(input)?;
    let (input, v) = opt(preceded(space1, float))(input)?;
    let (input, _) = opt(preceded(space1, float))(input)?;
    Ok((input, Vector2::new(u, v.unwrap_or(0.0))))
}

fn vertex_ref(input: &str) -> IResult<&str, VertexRef> {
    let (input, position) = integer(input)?;
    let (input, texcoord) = opt(preceded(char('/'), opt(integer)))(input)?;
    // Normals are parsed and dropped: faces are flat shaded.
    let (input, _) = opt(preceded(char('/'), opt(integer)))(input)?;
    Ok((
        input,
        VertexRef {
            position,
            texcoord: texcoord.flatten(),
        },
    ))
}

fn face_args(input: &str) -> IResult<&str, Vec<VertexRef>> {
    separated_list1(space1, vertex_ref)(input)
}
