// Befunge-93 command cells
//
// A command is the atomic value of a grid fragment: an opcode kind, an optional
// parameter (digit value or character code) and an optional tag.

use crate::codegen::error::CodeGenError;
use crate::codegen::tags::TagId;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// No instruction at all; the cell is free
    Unused,
    /// Explicit no-op filler that keeps a lane reserved
    Walkway,
    PcLeft,
    PcRight,
    PcUp,
    PcDown,
    PcRandom,
    PcJump,
    Stop,
    IfHorizontal,
    IfVertical,
    Add,
    Sub,
    Mul,
    Div,
    Modulo,
    Not,
    GreaterThan,
    Stringmode,
    StackDup,
    StackSwap,
    StackPop,
    OutInt,
    OutAscii,
    InInt,
    InAscii,
    ReflectGet,
    ReflectSet,
    /// Push a single digit; the parameter holds 0..=9
    Digit,
    /// Raw character; the parameter holds its code point
    Other,
}

lazy_static! {
    static ref GLYPH_TABLE: HashMap<char, CommandKind> = {
        let mut m = HashMap::new();
        m.insert('<', CommandKind::PcLeft);
        m.insert('>', CommandKind::PcRight);
        m.insert('^', CommandKind::PcUp);
        m.insert('v', CommandKind::PcDown);
        m.insert('?', CommandKind::PcRandom);
        m.insert('#', CommandKind::PcJump);
        m.insert('@', CommandKind::Stop);
        m.insert('_', CommandKind::IfHorizontal);
        m.insert('|', CommandKind::IfVertical);
        m.insert('+', CommandKind::Add);
        m.insert('-', CommandKind::Sub);
        m.insert('*', CommandKind::Mul);
        m.insert('/', CommandKind::Div);
        m.insert('%', CommandKind::Modulo);
        m.insert('!', CommandKind::Not);
        m.insert('`', CommandKind::GreaterThan);
        m.insert('"', CommandKind::Stringmode);
        m.insert(':', CommandKind::StackDup);
        m.insert('\\', CommandKind::StackSwap);
        m.insert('$', CommandKind::StackPop);
        m.insert('.', CommandKind::OutInt);
        m.insert(',', CommandKind::OutAscii);
        m.insert('&', CommandKind::InInt);
        m.insert('~', CommandKind::InAscii);
        m.insert('g', CommandKind::ReflectGet);
        m.insert('p', CommandKind::ReflectSet);
        m
    };
}

impl CommandKind {
    /// True iff mirroring the grid along x leaves the meaning of the cell intact
    pub fn is_direction_independent(self) -> bool {
        !matches!(
            self,
            CommandKind::PcLeft | CommandKind::PcRight | CommandKind::IfHorizontal
        )
    }

    fn fixed_glyph(self) -> Option<char> {
        let glyph = match self {
            CommandKind::Unused | CommandKind::Walkway => ' ',
            CommandKind::PcLeft => '<',
            CommandKind::PcRight => '>',
            CommandKind::PcUp => '^',
            CommandKind::PcDown => 'v',
            CommandKind::PcRandom => '?',
            CommandKind::PcJump => '#',
            CommandKind::Stop => '@',
            CommandKind::IfHorizontal => '_',
            CommandKind::IfVertical => '|',
            CommandKind::Add => '+',
            CommandKind::Sub => '-',
            CommandKind::Mul => '*',
            CommandKind::Div => '/',
            CommandKind::Modulo => '%',
            CommandKind::Not => '!',
            CommandKind::GreaterThan => '`',
            CommandKind::Stringmode => '"',
            CommandKind::StackDup => ':',
            CommandKind::StackSwap => '\\',
            CommandKind::StackPop => '$',
            CommandKind::OutInt => '.',
            CommandKind::OutAscii => ',',
            CommandKind::InInt => '&',
            CommandKind::InAscii => '~',
            CommandKind::ReflectGet => 'g',
            CommandKind::ReflectSet => 'p',
            CommandKind::Digit | CommandKind::Other => return None,
        };
        Some(glyph)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    pub param: Option<i64>,
    pub tag: Option<TagId>,
}

impl Default for Command {
    fn default() -> Self {
        Self::unused()
    }
}

impl Command {
    pub fn new(kind: CommandKind) -> Self {
        Command {
            kind,
            param: None,
            tag: None,
        }
    }

    pub fn unused() -> Self {
        Self::new(CommandKind::Unused)
    }

    pub fn walkway() -> Self {
        Self::new(CommandKind::Walkway)
    }

    /// Single digit push, 0..=9
    pub fn digit(d: u8) -> Result<Self, CodeGenError> {
        if d > 9 {
            return Err(CodeGenError::InternalInconsistency(format!(
                "digit command requested for {}",
                d
            )));
        }
        Ok(Command {
            kind: CommandKind::Digit,
            param: Some(d as i64),
            tag: None,
        })
    }

    /// Raw character cell (string-mode payload, variable slot symbol)
    pub fn chr(c: char) -> Self {
        Command {
            kind: CommandKind::Other,
            param: Some(c as i64),
            tag: None,
        }
    }

    /// Parse one glyph of Befunge-93 source text
    pub fn from_glyph(c: char) -> Self {
        if c == ' ' {
            return Self::unused();
        }
        if let Some(d) = c.to_digit(10) {
            return Command {
                kind: CommandKind::Digit,
                param: Some(d as i64),
                tag: None,
            };
        }
        match GLYPH_TABLE.get(&c) {
            Some(kind) => Self::new(*kind),
            None => Self::chr(c),
        }
    }

    pub fn with_tag(self, tag: TagId) -> Self {
        Command {
            tag: Some(tag),
            ..self
        }
    }

    /// A cell is empty iff it has no instruction and carries no tag
    pub fn is_empty(&self) -> bool {
        self.kind == CommandKind::Unused && self.tag.is_none()
    }

    /// No instruction, regardless of tag
    pub fn is_unused(&self) -> bool {
        self.kind == CommandKind::Unused
    }

    pub fn is_direction_independent(&self) -> bool {
        self.kind.is_direction_independent()
    }

    /// Character emitted for this cell; unused cells render as a space
    pub fn glyph(&self) -> char {
        if let Some(glyph) = self.kind.fixed_glyph() {
            return glyph;
        }
        let code = self.param.unwrap_or(0);
        match self.kind {
            CommandKind::Digit => char::from_digit(code as u32, 10).unwrap_or('?'),
            _ => u32::try_from(code)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or('?'),
        }
    }
}
