//! Procedural monster sprite sheets.
//!
//! Template-driven pixel-art generation: an archetype picks a body plan,
//! a theme palette colors it, and small per-frame offsets animate it. Each
//! sheet is 4 actions (IDLE, WALK, EAT, ATTACK) by 4 frames of 64 px.

use image::{Rgba, RgbaImage};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Frame edge length in pixels.
pub const FRAME: u32 = 64;
/// Frames per animation row.
pub const FRAMES_PER_ANIM: u32 = 4;

/// Body plan templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    Humanoid,
    Snake,
    Beast,
    Alien,
}

/// Humanoid flavor variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subtype {
    Thug,
    Wizard,
    Golem,
}

/// Animation rows, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anim {
    Idle,
    Walk,
    Eat,
    Attack,
}

impl Anim {
    pub const ALL: [Anim; 4] = [Anim::Idle, Anim::Walk, Anim::Eat, Anim::Attack];
}

/// Palette slot a template pixel refers to; resolved by the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Primary,
    Secondary,
    EyeWhite,
    Ink,
    Accent,
    AccentAlt,
}

/// Concrete palette.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub primary: Rgba<u8>,
    pub secondary: Rgba<u8>,
    pub accent: Rgba<u8>,
    pub alt: Rgba<u8>,
}

const fn rgb(hex: u32) -> Rgba<u8> {
    Rgba([(hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 255])
}

const WHITE: Rgba<u8> = rgb(0xFFFFFF);
const BLACK: Rgba<u8> = rgb(0x000000);
const RED: Rgba<u8> = rgb(0xFF0000);

/// The elemental theme palettes (water, fire, grass, poison, shadow).
const THEMES: [Theme; 5] = [
    Theme {
        primary: rgb(0x6390F0),
        secondary: rgb(0x4A6CC3),
        accent: WHITE,
        alt: rgb(0xEAD6B8),
    },
    Theme {
        primary: rgb(0xF08030),
        secondary: rgb(0xC06020),
        accent: WHITE,
        alt: rgb(0xF8D030),
    },
    Theme {
        primary: rgb(0x80C070),
        secondary: rgb(0x509050),
        accent: WHITE,
        alt: rgb(0x609070),
    },
    Theme {
        primary: rgb(0xA040A0),
        secondary: rgb(0x703070),
        accent: WHITE,
        alt: rgb(0xE0E0E0),
    },
    Theme {
        primary: rgb(0x303030),
        secondary: rgb(0x101010),
        accent: RED,
        alt: rgb(0xA0A0A0),
    },
];

impl Theme {
    fn color(&self, slot: Slot) -> Rgba<u8> {
        match slot {
            Slot::Primary => self.primary,
            Slot::Secondary => self.secondary,
            Slot::EyeWhite => WHITE,
            Slot::Ink => BLACK,
            Slot::Accent => self.accent,
            Slot::AccentAlt => self.alt,
        }
    }
}

/// A 64x64 template grid of palette slots; out-of-range writes are
/// clipped, so animation offsets can push shapes off the edge safely.
pub struct PixelGrid {
    cells: Vec<Option<Slot>>,
}

impl PixelGrid {
    pub fn new() -> Self {
        Self {
            cells: vec![None; (FRAME * FRAME) as usize],
        }
    }

    fn set(&mut self, x: i32, y: i32, slot: Slot) {
        if (0..FRAME as i32).contains(&x) && (0..FRAME as i32).contains(&y) {
            self.cells[(y as u32 * FRAME + x as u32) as usize] = Some(slot);
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Slot> {
        self.cells[(y * FRAME + x) as usize]
    }

    /// Filled axis-aligned rectangle.
    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, slot: Slot) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, slot);
            }
        }
    }

    /// Filled disc.
    pub fn disc(&mut self, cx: i32, cy: i32, r: i32, slot: Slot) {
        for y in (cy - r)..=(cy + r) {
            for x in (cx - r)..=(cx + r) {
                if (x - cx) * (x - cx) + (y - cy) * (y - cy) <= r * r {
                    self.set(x, y, slot);
                }
            }
        }
    }
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_humanoid(grid: &mut PixelGrid, frame: u32, subtype: Subtype, anim: Anim) {
    let f = frame as i32;
    let mut bob = 0;
    let mut l_arm = 0;
    let mut r_arm = 0;
    let mut l_leg = 0;
    let mut r_leg = 0;
    match anim {
        Anim::Idle => bob = if frame % 2 == 0 { 1 } else { 0 },
        Anim::Walk => {
            bob = (f - 1).abs();
            l_leg = if f == 0 { -2 } else { 2 };
            r_leg = if f == 0 { 2 } else { -2 };
        }
        Anim::Attack => {
            l_arm = if f == 1 { -4 } else { 0 };
            r_arm = if f == 2 { 4 } else { 0 };
        }
        Anim::Eat => bob = if frame % 2 != 0 { -1 } else { 0 },
    }

    // Legs and feet.
    grid.rect(24, 40 + bob + l_leg, 6, 18, Slot::Secondary);
    grid.rect(34, 40 + bob + r_leg, 6, 18, Slot::Secondary);
    grid.rect(22, 56 + bob + l_leg, 8, 4, Slot::Secondary);
    grid.rect(34, 56 + bob + r_leg, 8, 4, Slot::Secondary);

    // Torso.
    match subtype {
        Subtype::Thug => {
            grid.rect(20, 24 + bob, 24, 20, Slot::Primary);
            grid.rect(22, 26 + bob, 20, 16, Slot::Secondary);
        }
        Subtype::Wizard => {
            grid.rect(22, 24 + bob, 20, 28, Slot::Primary);
            grid.rect(28, 24 + bob, 8, 28, Slot::Secondary);
        }
        Subtype::Golem => {
            grid.rect(18, 22 + bob, 28, 22, Slot::Primary);
        }
    }

    // Head.
    let head_y = 10 + bob;
    if subtype == Subtype::Wizard {
        grid.rect(20, head_y - 8, 24, 4, Slot::Accent);
        grid.rect(24, head_y - 16, 16, 10, Slot::Primary);
    }
    grid.rect(22, head_y, 20, 18, Slot::Primary);

    // Eyes: thugs wear shades.
    if subtype == Subtype::Thug {
        grid.rect(24, head_y + 6, 16, 4, Slot::Ink);
    } else {
        grid.rect(26, head_y + 6, 4, 4, Slot::EyeWhite);
        grid.rect(34, head_y + 6, 4, 4, Slot::EyeWhite);
        grid.rect(28, head_y + 7, 2, 2, Slot::Ink);
        grid.rect(34, head_y + 7, 2, 2, Slot::Ink);
    }

    // Arms; wizards hold a staff with an orb.
    if subtype == Subtype::Wizard {
        grid.rect(44 + r_arm, 24 + bob, 4, 16, Slot::Primary);
        grid.rect(46 + r_arm, 10 + bob, 2, 40, Slot::AccentAlt);
        grid.rect(44 + r_arm, 8 + bob, 6, 6, Slot::Accent);
    }
    grid.rect(14, 24 + bob + l_arm, 6, 16, Slot::Primary);
    if subtype != Subtype::Wizard {
        grid.rect(44, 24 + bob + r_arm, 6, 16, Slot::Primary);
    }
}

fn draw_snake(grid: &mut PixelGrid, frame: u32, anim: Anim, hooded: bool) {
    let sway: f32 = match anim {
        Anim::Idle => {
            if frame % 2 == 0 {
                2.0
            } else {
                -2.0
            }
        }
        Anim::Walk => 4.0 * (frame as f32 - 1.5),
        _ => 0.0,
    };

    // Coiled body segments with belly pattern.
    for i in 0..5i32 {
        let s = sway * if i % 2 == 0 { 1.0 } else { -1.0 };
        grid.disc(32 + s as i32, 56 - i * 6, 10 - i, Slot::Primary);
        grid.disc(32 + s as i32, 56 - i * 6, 6 - i, Slot::Secondary);
    }

    let head_x = 32 + sway as i32;
    let head_y = 26;
    grid.disc(head_x, head_y, 12, Slot::Primary);

    if hooded {
        grid.rect(head_x - 14, head_y - 4, 4, 12, Slot::Primary);
        grid.rect(head_x + 10, head_y - 4, 4, 12, Slot::Primary);
    }

    grid.rect(head_x - 6, head_y - 2, 4, 4, Slot::EyeWhite);
    grid.rect(head_x + 2, head_y - 2, 4, 4, Slot::EyeWhite);
    grid.rect(head_x - 5, head_y - 1, 2, 4, Slot::Ink);
    grid.rect(head_x + 3, head_y - 1, 2, 4, Slot::Ink);
}

fn draw_beast(grid: &mut PixelGrid, frame: u32, anim: Anim) {
    let bob = if frame % 2 == 0 { 1 } else { 0 };

    // Shell and body.
    grid.disc(32, 40 + bob, 18, Slot::Secondary);

    let lx = if anim == Anim::Walk && frame == 0 { -2 } else { 0 };
    let rx = if anim == Anim::Walk && frame == 2 { 2 } else { 0 };
    grid.rect(18 + lx, 50 + bob, 8, 10, Slot::Primary);
    grid.rect(38 + rx, 50 + bob, 8, 10, Slot::Primary);
    grid.rect(22, 52 + bob, 8, 8, Slot::Primary);
    grid.rect(34, 52 + bob, 8, 8, Slot::Primary);

    grid.rect(26, 28 + bob, 12, 10, Slot::Primary);
    grid.rect(26, 30 + bob, 4, 4, Slot::EyeWhite);
    grid.rect(34, 30 + bob, 4, 4, Slot::EyeWhite);
}

fn draw_alien(grid: &mut PixelGrid, frame: u32, anim: Anim) {
    let float_y = if anim == Anim::Idle {
        (4.0 * (frame as f32).sin()) as i32
    } else {
        0
    };

    grid.disc(32, 32 + float_y, 14, Slot::Primary);

    // Orbiting glow ring.
    for i in 0..4 {
        let angle = frame as f32 * 0.5 + i as f32 * 1.57;
        let ox = (20.0 * angle.cos()) as i32;
        let oy = (10.0 * angle.sin()) as i32;
        grid.disc(32 + ox, 32 + float_y + oy, 4, Slot::Accent);
    }

    // Single eye.
    grid.disc(32, 32 + float_y, 6, Slot::EyeWhite);
    grid.disc(32, 32 + float_y, 2, Slot::Ink);
}

/// Draw one animation frame of the template grid.
pub fn draw_frame(
    archetype: Archetype,
    frame: u32,
    subtype: Option<Subtype>,
    anim: Anim,
    hooded: bool,
) -> PixelGrid {
    let mut grid = PixelGrid::new();
    match archetype {
        Archetype::Humanoid => {
            draw_humanoid(&mut grid, frame, subtype.unwrap_or(Subtype::Golem), anim)
        }
        Archetype::Snake => draw_snake(&mut grid, frame, anim, hooded),
        Archetype::Beast => draw_beast(&mut grid, frame, anim),
        Archetype::Alien => draw_alien(&mut grid, frame, anim),
    }
    grid
}

/// Archetype distribution: 40% humanoid, 20% each snake/beast/alien.
pub fn archetype_for_seed(seed: u64) -> Archetype {
    match seed % 10 {
        0..=3 => Archetype::Humanoid,
        4 | 5 => Archetype::Snake,
        6 | 7 => Archetype::Beast,
        _ => Archetype::Alien,
    }
}

fn shadow(sheet: &mut RgbaImage, x_off: u32, y_off: u32) {
    // Soft ground ellipse under the sprite, 18x4 half-axes at (32, 60).
    for dy in -4i32..=4 {
        for dx in -18i32..=18 {
            let nx = dx as f32 / 18.0;
            let ny = dy as f32 / 4.0;
            if nx * nx + ny * ny <= 1.0 {
                let px = x_off as i32 + 32 + dx;
                let py = y_off as i32 + 60 + dy;
                if px >= 0 && py >= 0 && (px as u32) < sheet.width() && (py as u32) < sheet.height()
                {
                    sheet.put_pixel(px as u32, py as u32, Rgba([0, 0, 0, 77]));
                }
            }
        }
    }
}

/// Generate one full monster sheet deterministically from a seed.
pub fn generate_monster_sheet(seed: u64) -> RgbaImage {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let archetype = archetype_for_seed(seed);
    let subtype = if archetype == Archetype::Humanoid {
        [Subtype::Thug, Subtype::Wizard, Subtype::Golem]
            .choose(&mut rng)
            .copied()
    } else {
        None
    };
    // Cobra hood is a per-monster trait, not a per-frame roll.
    let hooded = rng.gen_bool(0.5);

    let mut theme = THEMES[rng.gen_range(0..THEMES.len())];
    match subtype {
        Some(Subtype::Thug) => {
            theme = Theme {
                primary: rgb(0x404040),
                secondary: rgb(0x202020),
                accent: WHITE,
                alt: rgb(0xFFD700),
            };
        }
        Some(Subtype::Wizard) => {
            theme.accent = rgb(0xA020F0);
        }
        _ => {}
    }

    let mut sheet = RgbaImage::new(FRAME * FRAMES_PER_ANIM, FRAME * Anim::ALL.len() as u32);
    for (row, anim) in Anim::ALL.into_iter().enumerate() {
        for col in 0..FRAMES_PER_ANIM {
            let x_off = col * FRAME;
            let y_off = row as u32 * FRAME;
            shadow(&mut sheet, x_off, y_off);

            let grid = draw_frame(archetype, col, subtype, anim, hooded);
            for y in 0..FRAME {
                for x in 0..FRAME {
                    if let Some(slot) = grid.get(x, y) {
                        sheet.put_pixel(x_off + x, y_off + y, theme.color(slot));
                    }
                }
            }
        }
    }
    sheet
}
