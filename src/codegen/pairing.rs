// Directional pairing
//
// The same logical operation laid out twice: once for a cursor travelling right
// (forward) and once for a cursor travelling left (mirrored).

use crate::codegen::error::CodeGenError;
use crate::codegen::fragment::GridFragment;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectionalPair {
    pub forward: GridFragment,
    pub mirrored: GridFragment,
}

impl DirectionalPair {
    pub fn new(forward: GridFragment, mirrored: GridFragment) -> Self {
        DirectionalPair { forward, mirrored }
    }

    /// Pair with no code on either side, used to even out the pairing count
    pub fn empty() -> Self {
        Self::default()
    }

    /// Derive the mirrored side from the forward one
    pub fn from_forward(forward: GridFragment) -> Result<Self, CodeGenError> {
        let mirrored = forward.mirrored()?;
        Ok(DirectionalPair { forward, mirrored })
    }

    /// Width of the wider side
    pub fn max_width(&self) -> i32 {
        self.forward.width().max(self.mirrored.width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_forward_mirrors() {
        let pair = DirectionalPair::from_forward(GridFragment::from_lines(&["12+p"]).unwrap())
            .unwrap();
        assert_eq!(pair.mirrored.to_lines(' '), vec!["p+21"]);
        assert_eq!(pair.max_width(), 4);
    }

    #[test]
    fn test_from_forward_rejects_turns() {
        let forward = GridFragment::from_lines(&["1v"]).unwrap();
        assert!(DirectionalPair::from_forward(forward).is_ok());

        let forward = GridFragment::from_lines(&["1<"]).unwrap();
        assert!(matches!(
            DirectionalPair::from_forward(forward),
            Err(CodeGenError::NonMirrorableCell { x: 1, y: 0, .. })
        ));
    }

    #[test]
    fn test_empty_pair() {
        let pair = DirectionalPair::empty();
        assert_eq!(pair.max_width(), 0);
        assert!(pair.forward.is_empty() && pair.mirrored.is_empty());
    }
}
