// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ parser using nom
//!
//! Only the statements that carry triangle geometry are interpreted
//! (`v`, `vn`, `vt`, `f`). Everything else is skipped.

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::{fold_many1, many0},
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::obj::{ObjCorner, ObjGeometry};

/// Face corner as written in the file: raw (possibly negative) indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCorner {
    pub vertex: i64,
    pub texcoord: Option<i64>,
    pub normal: Option<i64>,
}

/// A single OBJ statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'a> {
    /// v x y z [w]
    Position([f32; 3]),
    /// vn x y z
    Normal([f32; 3]),
    /// vt u [v [w]]
    TexCoord([f32; 2]),
    /// f c1 c2 c3 ...
    Face(SmallVec<[RawCorner; 4]>),
    /// Any statement we don't interpret
    Other(&'a str),
}

fn is_space(c: char) -> bool {
    c.is_ascii_whitespace()
}

/// Parse a float token
fn number(input: &str) -> IResult<&str, f32> {
    map_res(take_while1(|c: char| !is_space(c)), |s: &str| {
        fast_float::parse::<f32, _>(s)
    })(input)
}

/// Parse a signed integer index: 42, -3
fn index(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>()
    })(input)
}

fn vec3(input: &str) -> IResult<&str, [f32; 3]> {
    map(
        tuple((
            preceded(space1, number),
            preceded(space1, number),
            preceded(space1, number),
        )),
        |(x, y, z)| [x, y, z],
    )(input)
}

/// Trailing numbers (w, or per-vertex colour extensions) are accepted and dropped
fn extra_numbers(input: &str) -> IResult<&str, ()> {
    map(many0(preceded(space1, number)), |_| ())(input)
}

fn texcoord(input: &str) -> IResult<&str, [f32; 2]> {
    map(
        terminated(
            pair(preceded(space1, number), opt(preceded(space1, number))),
            extra_numbers,
        ),
        |(u, v)| [u, v.unwrap_or(0.0)],
    )(input)
}

/// Parse a face corner: v, v/vt, v//vn, v/vt/vn
fn corner(input: &str) -> IResult<&str, RawCorner> {
    map(
        pair(
            index,
            opt(preceded(
                char('/'),
                pair(opt(index), opt(preceded(char('/'), index))),
            )),
        ),
        |(vertex, rest)| {
            let (texcoord, normal) = rest.unwrap_or((None, None));
            RawCorner {
                vertex,
                texcoord,
                normal,
            }
        },
    )(input)
}

fn corners(input: &str) -> IResult<&str, SmallVec<[RawCorner; 4]>> {
    fold_many1(preceded(space1, corner), SmallVec::new, |mut acc, c| {
        acc.push(c);
        acc
    })(input)
}

/// Parse one logical line (comments already stripped)
pub fn statement(input: &str) -> IResult<&str, Statement<'_>> {
    let (rest, keyword) = take_while1(|c: char| !is_space(c))(input)?;
    match keyword {
        "v" => map(terminated(vec3, extra_numbers), Statement::Position)(rest),
        "vn" => map(vec3, Statement::Normal)(rest),
        "vt" => map(texcoord, Statement::TexCoord)(rest),
        "f" => map(corners, Statement::Face)(rest),
        other => Ok(("", Statement::Other(other))),
    }
}

/// Iterate logical lines as (1-based line number, text), joining `\` continuations
fn logical_lines(text: &str) -> impl Iterator<Item = (usize, String)> + '_ {
    let mut lines = text.lines().enumerate();
    std::iter::from_fn(move || {
        let (number, first) = lines.next()?;
        let mut joined = String::from(first);
        while joined.ends_with('\\') {
            joined.pop();
            match lines.next() {
                Some((_, next)) => {
                    joined.push(' ');
                    joined.push_str(next);
                }
                None => break,
            }
        }
        Some((number + 1, joined))
    })
}

/// Resolve a 1-based or negative (relative) index against the current count
fn resolve(raw: i64, count: usize, line: usize) -> Result<u32> {
    let resolved = match raw {
        0 => return Err(Error::ZeroIndex { line }),
        r if r > 0 => r - 1,
        r => (count as i64) + r,
    };
    u32::try_from(resolved).map_err(|_| Error::IndexOverflow { line })
}

fn resolve_corner(raw: &RawCorner, obj: &ObjGeometry, line: usize) -> Result<ObjCorner> {
    Ok(ObjCorner {
        vertex: resolve(raw.vertex, obj.positions.len(), line)?,
        texcoord: raw
            .texcoord
            .map(|t| resolve(t, obj.texcoords.len(), line))
            .transpose()?,
        normal: raw
            .normal
            .map(|n| resolve(n, obj.normals.len(), line))
            .transpose()?,
    })
}

/// Parse OBJ text into triangulated attribute arrays.
///
/// Polygons are triangulated as a fan around their first corner.
pub fn parse_obj(text: &str) -> Result<ObjGeometry> {
    let mut obj = ObjGeometry::new();

    for (line, raw) in logical_lines(text) {
        let content = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw.as_str(),
        };
        let content = content.trim();
        if content.is_empty() {
            continue;
        }

        let parsed = all_consuming(terminated(statement, space0))(content);
        let stmt = match parsed {
            Ok((_, stmt)) => stmt,
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                return Err(Error::syntax(
                    line,
                    format!("unexpected input near `{}`", e.input.trim()),
                ));
            }
            Err(nom::Err::Incomplete(_)) => {
                return Err(Error::syntax(line, "incomplete statement"));
            }
        };

        match stmt {
            Statement::Position(p) => obj.positions.push(p),
            Statement::Normal(n) => obj.normals.push(n),
            Statement::TexCoord(t) => obj.texcoords.push(t),
            Statement::Face(raw_corners) => {
                if raw_corners.len() < 3 {
                    return Err(Error::syntax(
                        line,
                        format!("face has {} corners, need at least 3", raw_corners.len()),
                    ));
                }
                let resolved = raw_corners
                    .iter()
                    .map(|c| resolve_corner(c, &obj, line))
                    .collect::<Result<SmallVec<[ObjCorner; 4]>>>()?;
                for i in 1..resolved.len() - 1 {
                    obj.triangles
                        .push([resolved[0], resolved[i], resolved[i + 1]]);
                }
            }
            Statement::Other(_) => {}
        }
    }

    Ok(obj)
}
