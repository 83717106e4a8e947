use crate::{InstanceError, Section};

/// Decodes `bytes` as UTF-8, dropping invalid sequences.
pub(crate) fn decode_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Whitespace-separated integer stream shared by the instance readers.
pub(crate) struct Tokens<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a str) -> Result<Self, InstanceError> {
        let tokens = text.split_whitespace().collect::<Vec<&str>>();
        if tokens.is_empty() {
            return Err(InstanceError::Empty);
        }
        Ok(Self { tokens, pos: 0 })
    }

    fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    pub fn node_count(&mut self) -> Result<usize, InstanceError> {
        let token = self.take(Section::NodeCount, 1)?[0];
        let num_nodes = token
            .parse::<usize>()
            .map_err(|_| InstanceError::InvalidToken {
                section: Section::NodeCount,
                token: token.to_string(),
            })?;
        if num_nodes == 0 {
            return Err(InstanceError::InvalidNodeCount(num_nodes));
        }
        Ok(num_nodes)
    }

    pub fn int(&mut self, section: Section) -> Result<i64, InstanceError> {
        Ok(self.ints(section, 1)?[0])
    }

    pub fn ints(&mut self, section: Section, count: usize) -> Result<Vec<i64>, InstanceError> {
        self.take(section, count)?
            .iter()
            .map(|token| {
                token.parse::<i64>().map_err(|_| InstanceError::InvalidToken {
                    section,
                    token: token.to_string(),
                })
            })
            .collect()
    }

    /// `num_rows` rows of `row_len` integers each. `row_len` must be non-zero.
    pub fn rows(
        &mut self,
        section: Section,
        num_rows: usize,
        row_len: usize,
    ) -> Result<Vec<Vec<i64>>, InstanceError> {
        let count = num_rows
            .checked_mul(row_len)
            .ok_or(InstanceError::InvalidNodeCount(num_rows))?;
        let flat = self.ints(section, count)?;
        Ok(flat.chunks(row_len).map(|row| row.to_vec()).collect())
    }

    fn take(&mut self, section: Section, count: usize) -> Result<&[&'a str], InstanceError> {
        if count > self.remaining() {
            return Err(InstanceError::Truncated {
                section,
                expected: count,
                found: self.remaining(),
            });
        }
        let start = self.pos;
        self.pos += count;
        Ok(&self.tokens[start..self.pos])
    }
}
