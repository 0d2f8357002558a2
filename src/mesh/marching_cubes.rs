//! Marching cubes isosurface extraction
//!
//! Every cube of eight neighbouring samples is classified by which corners lie
//! above the isovalue. That 8-bit configuration selects up to five triangles
//! from [`TRIANGLE_TABLE`]; each triangle corner sits on a cube edge, at the
//! point where linear interpolation between the edge's two samples meets the
//! isovalue. Vertices on shared edges are emitted once and reused by all
//! neighbouring cubes, so the output is an indexed, consistently wound mesh.

use crate::float_types::Real;
use crate::grid::{Grid, GridResolution};
use crate::mesh::Mesh;
use crate::mesh::traits::IsosurfaceOps;
use hashbrown::HashMap;
use nalgebra::Point3;

/// Corner `c` of a cube sits at offset `(c & 1, (c >> 1) & 1, (c >> 2) & 1)`.
const CORNERS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [0, 1, 0],
    [1, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [0, 1, 1],
    [1, 1, 1],
];

/// Cube edges as (offset of the lower endpoint, axis). Edges 0-3 run along X,
/// 4-7 along Y, 8-11 along Z.
const EDGES: [([usize; 3], usize); 12] = [
    ([0, 0, 0], 0),
    ([0, 1, 0], 0),
    ([0, 0, 1], 0),
    ([0, 1, 1], 0),
    ([0, 0, 0], 1),
    ([1, 0, 0], 1),
    ([0, 0, 1], 1),
    ([1, 0, 1], 1),
    ([0, 0, 0], 2),
    ([1, 0, 0], 2),
    ([0, 1, 0], 2),
    ([1, 1, 0], 2),
];

/// Marching cubes extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct MarchingCubes;

impl MarchingCubes {
    pub const fn new() -> Self {
        Self
    }
}

impl IsosurfaceOps for MarchingCubes {
    fn extract(&self, grid: &Grid, isovalue: Real) -> Mesh {
        let (lo, hi) = grid.value_range();
        if !(isovalue >= lo && isovalue < hi) {
            log::debug!(
                "isovalue {} does not cross the field range [{}, {}], nothing to extract",
                isovalue,
                lo,
                hi
            );
            return Mesh::new();
        }

        let GridResolution { nx, ny, nz } = grid.resolution();
        let mut builder = SurfaceBuilder::new(grid, isovalue);

        for k in 0..nz - 1 {
            for j in 0..ny - 1 {
                for i in 0..nx - 1 {
                    builder.march_cube([i, j, k]);
                }
            }
        }

        let mesh = builder.finish();
        log::debug!(
            "marching cubes over {}x{}x{} samples produced {} vertices and {} faces",
            nx,
            ny,
            nz,
            mesh.vertices.len(),
            mesh.faces.len()
        );
        mesh
    }
}

/// Extract the isosurface of `grid` at `isovalue` with marching cubes.
pub fn extract(grid: &Grid, isovalue: Real) -> Mesh {
    MarchingCubes::new().extract(grid, isovalue)
}

/// Accumulates vertices and faces while the cubes are visited.
struct SurfaceBuilder<'a> {
    grid: &'a Grid,
    isovalue: Real,
    /// (linear index of the edge's lower node, axis) -> vertex index
    edge_vertices: HashMap<(usize, usize), usize>,
    vertices: Vec<Point3<Real>>,
    faces: Vec<[usize; 3]>,
}

impl<'a> SurfaceBuilder<'a> {
    fn new(grid: &'a Grid, isovalue: Real) -> Self {
        SurfaceBuilder {
            grid,
            isovalue,
            edge_vertices: HashMap::new(),
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    fn inside(&self, node: [usize; 3]) -> bool {
        self.grid.at(node[0], node[1], node[2]) > self.isovalue
    }

    fn configuration(&self, base: [usize; 3]) -> usize {
        CORNERS
            .iter()
            .enumerate()
            .filter(|(_, offset)| self.inside(offset_node(base, **offset)))
            .fold(0, |config, (corner, _)| config | (1 << corner))
    }

    fn march_cube(&mut self, base: [usize; 3]) {
        let config = self.configuration(base);
        if config == 0 || config == 0xFF {
            return;
        }

        let mut corners = [0usize; 3];
        for (n, edge) in triangle_edges(TRIANGLE_TABLE[config]).enumerate() {
            corners[n % 3] = self.edge_vertex(base, edge);
            if n % 3 == 2 {
                self.faces.push(corners);
            }
        }
    }

    /// Vertex on `edge` of the cube at `base`, created on first use.
    fn edge_vertex(&mut self, base: [usize; 3], edge: usize) -> usize {
        let (offset, axis) = EDGES[edge];
        let start = offset_node(base, offset);
        let key = (self.grid.linearize(start[0], start[1], start[2]), axis);
        if let Some(&index) = self.edge_vertices.get(&key) {
            return index;
        }

        let mut end = start;
        end[axis] += 1;
        let va = self.grid.at(start[0], start[1], start[2]);
        let vb = self.grid.at(end[0], end[1], end[2]);
        let t = ((self.isovalue - va) / (vb - va)).clamp(0.0, 1.0);

        let mut lattice = Point3::new(start[0] as Real, start[1] as Real, start[2] as Real);
        lattice[axis] += t;

        let index = self.vertices.len();
        self.vertices.push(self.grid.lattice_to_world(&lattice));
        self.edge_vertices.insert(key, index);
        index
    }

    fn finish(self) -> Mesh {
        Mesh {
            vertices: self.vertices,
            faces: self.faces,
            ..Mesh::default()
        }
    }
}

#[inline]
const fn offset_node(base: [usize; 3], offset: [usize; 3]) -> [usize; 3] {
    [base[0] + offset[0], base[1] + offset[1], base[2] + offset[2]]
}

/// Decode a packed table entry into its sequence of edge indices, three per triangle.
fn triangle_edges(entry: u64) -> impl Iterator<Item = usize> {
    let count = (entry & 0xF) as usize * 3;
    (0..count).map(move |n| ((entry >> (4 + 4 * n)) & 0xF) as usize)
}

/// Triangulation for each of the 256 corner configurations.
///
/// Bits `[3:0]` hold the triangle count (0-5); every following nibble is an
/// edge index (0-11), three per triangle, wound counter-clockwise when seen
/// from the outside.
#[rustfmt::skip]
static TRIANGLE_TABLE: [u64; 256] = [
    0, 33793, 36945, 159668546, 18961, 144771090, 5851666, 595283255635,
    20913, 67640146, 193993474, 655980856339, 88782242, 736732689667, 797430812739, 194554754,
    26657, 104867330, 136709522, 298069416227, 109224258, 8877909667, 318136408323, 1567994331701604,
    189884450, 350847647843, 559958167731, 3256298596865604, 447393122899, 651646838401572, 2538311371089956, 737032694307,
    29329, 43484162, 91358498, 374810899075, 158485010, 178117478419, 88675058979, 433581536604804,
    158486962, 649105605635, 4866906995, 3220959471609924, 649165714851, 3184943915608436, 570691368417972, 595804498035,
    124295042, 431498018963, 508238522371, 91518530, 318240155763, 291789778348404, 1830001131721892, 375363605923,
    777781811075, 1136111028516116, 3097834205243396, 508001629971, 2663607373704004, 680242583802939237, 333380770766129845, 179746658,
    42545, 138437538, 93365810, 713842853011, 73602098, 69575510115, 23964357683, 868078761575828,
    28681778, 713778574611, 250912709379, 2323825233181284, 302080811955, 3184439127991172, 1694042660682596, 796909779811,
    176306722, 150327278147, 619854856867, 1005252473234484, 211025400963, 36712706, 360743481544788, 150627258963,
    117482600995, 1024968212107700, 2535169275963444, 4734473194086550421, 628107696687956, 9399128243, 5198438490361643573, 194220594,
    104474994, 566996932387, 427920028243, 2014821863433780, 492093858627, 147361150235284, 2005882975110676, 9671606099636618005,
    777701008947, 3185463219618820, 482784926917540, 2900953068249785909, 1754182023747364, 4274848857537943333, 13198752741767688709, 2015093490989156,
    591272318771, 2659758091419812, 1531044293118596, 298306479155, 408509245114388, 210504348563, 9248164405801223541, 91321106,
    2660352816454484, 680170263324308757, 8333659837799955077, 482966828984116, 4274926723105633605, 3184439197724820, 192104450, 15217,
    45937, 129205250, 129208402, 529245952323, 169097138, 770695537027, 382310500883, 2838550742137652,
    122763026, 277045793139, 81608128403, 1991870397907988, 362778151475, 2059003085103236, 2132572377842852, 655681091891,
    58419234, 239280858627, 529092143139, 1568257451898804, 447235128115, 679678845236084, 2167161349491220, 1554184567314086709,
    165479003923, 1428768988226596, 977710670185060, 10550024711307499077, 1305410032576132, 11779770265620358997, 333446212255967269, 978168444447012,
    162736434, 35596216627, 138295313843, 891861543990356, 692616541075, 3151866750863876, 100103641866564, 6572336607016932133,
    215036012883, 726936420696196, 52433666, 82160664963, 2588613720361524, 5802089162353039525, 214799000387, 144876322,
    668013605731, 110616894681956, 1601657732871812, 430945547955, 3156382366321172, 7644494644932993285, 3928124806469601813, 3155990846772900,
    339991010498708, 10743689387941597493, 5103845475, 105070898, 3928064910068824213, 156265010, 1305138421793636, 27185,
    195459938, 567044449971, 382447549283, 2175279159592324, 443529919251, 195059004769796, 2165424908404116, 1554158691063110021,
    504228368803, 1436350466655236, 27584723588724, 1900945754488837749, 122971970, 443829749251, 302601798803, 108558722,
    724700725875, 43570095105972, 2295263717447940, 2860446751369014181, 2165106202149444, 69275726195, 2860543885641537797, 2165106320445780,
    2280890014640004, 11820349930268368933, 8721082628082003989, 127050770, 503707084675, 122834978, 2538193642857604, 10129,
    801441490467, 2923200302876740, 1443359556281892, 2901063790822564949, 2728339631923524, 7103874718248233397, 12775311047932294245, 95520290,
    2623783208098404, 1900908618382410757, 137742672547, 2323440239468964, 362478212387, 727199575803140, 73425410, 34337,
    163101314, 668566030659, 801204361987, 73030562, 591509145619, 162574594, 100608342969108, 5553,
    724147968595, 1436604830452292, 176259090, 42001, 143955266, 2385, 18433, 0,
];
