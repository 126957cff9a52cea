use crate::debug::Debugger;
use crate::num::ScriptNum;
use std::fmt::Display;
use std::ops::Deref;
use std::sync::Arc;

/// Stack error type.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum StackError {
    #[error("invalid stack operation")]
    InvalidOperation,
    #[error(transparent)]
    Num(#[from] crate::num::NumError),
}

type Result<T> = std::result::Result<T, StackError>;

/// A stack used for managing script execution data with various operations.
///
/// Numeric reads honour the configured maximum operand size and the
/// minimal-data rule. Pushes and pops are reported to the attached
/// [`Debugger`], if any.
#[derive(Clone)]
pub struct Stack {
    data: Vec<Vec<u8>>,
    max_num_len: usize,
    verify_minimaldata: bool,
    after_genesis: bool,
    debugger: Option<Arc<dyn Debugger>>,
}

impl Default for Stack {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            max_num_len: ScriptNum::MAX_NUM_SIZE,
            verify_minimaldata: false,
            after_genesis: false,
            debugger: None,
        }
    }
}

impl std::fmt::Debug for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stack")
            .field("data", &self.data)
            .field("max_num_len", &self.max_num_len)
            .field("verify_minimaldata", &self.verify_minimaldata)
            .field("after_genesis", &self.after_genesis)
            .finish()
    }
}

/// Two stacks are equal when they hold the same elements.
impl PartialEq for Stack {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for Stack {}

impl Display for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;

        for (i, item) in self.data.iter().enumerate() {
            if item.is_empty() {
                write!(f, "<empty>")?;
            } else {
                write!(f, "{}", hex::encode(item))?;
            }

            if i != self.data.len() - 1 {
                write!(f, ", ")?;
            }
        }

        write!(f, "]")
    }
}

impl From<Vec<Vec<u8>>> for Stack {
    fn from(data: Vec<Vec<u8>>) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }
}

impl Deref for Stack {
    type Target = [Vec<u8>];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl Stack {
    #[inline]
    pub fn new(max_num_len: usize, verify_minimaldata: bool, after_genesis: bool) -> Self {
        Self {
            data: Vec::new(),
            max_num_len,
            verify_minimaldata,
            after_genesis,
            debugger: None,
        }
    }

    /// Explicitly an empty stack, [].
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn set_debugger(&mut self, debugger: Option<Arc<dyn Debugger>>) {
        self.debugger = debugger;
    }

    pub fn verify_minimaldata(&self) -> bool {
        self.verify_minimaldata
    }

    /// Returns the stack items, bottom first.
    pub fn to_vec(&self) -> Vec<Vec<u8>> {
        self.data.clone()
    }

    /// Replaces the stack items without notifying the debugger.
    pub(crate) fn set_data(&mut self, data: Vec<Vec<u8>>) {
        self.data = data;
    }

    pub(crate) fn clear(&mut self) {
        self.data.clear();
    }

    // Ensure there are at least `n` elements on the stack.
    #[inline]
    pub fn require(&self, len: usize) -> Result<()> {
        if self.data.len() < len {
            return Err(StackError::InvalidOperation);
        }
        Ok(())
    }

    /// Returns the last element of the stack.
    #[inline]
    pub fn last(&self) -> Result<&Vec<u8>> {
        self.data.last().ok_or(StackError::InvalidOperation)
    }

    /// Removes and returns the last element of the stack.
    pub fn pop(&mut self) -> Result<Vec<u8>> {
        if let Some(debugger) = &self.debugger {
            debugger.before_stack_pop(&self.data);
        }
        let value = self.data.pop().ok_or(StackError::InvalidOperation)?;
        if let Some(debugger) = &self.debugger {
            debugger.after_stack_pop(&self.data, &value);
        }
        Ok(value)
    }

    /// Push an element onto the stack.
    pub fn push(&mut self, value: Vec<u8>) -> &mut Self {
        if let Some(debugger) = &self.debugger {
            debugger.before_stack_push(&self.data, &value);
        }
        self.data.push(value);
        if let Some(debugger) = &self.debugger {
            debugger.after_stack_push(&self.data);
        }
        self
    }

    /// Returns the element at the specified position from the top of the stack.
    ///
    /// `self.top(0)` is equalant to `self.last()`.
    #[inline]
    pub fn top(&self, i: usize) -> Result<&Vec<u8>> {
        let pos = i.checked_add(1).ok_or(StackError::InvalidOperation)?;
        self.require(pos)?;
        Ok(&self.data[self.data.len() - pos])
    }

    /// Pops a number from the stack and converts it into a ScriptNum.
    #[inline]
    pub fn pop_num(&mut self) -> Result<ScriptNum> {
        let value = self.pop()?;
        self.decode_num(&value, self.max_num_len)
    }

    /// Pops a number whose encoding may be up to `max_size` bytes long.
    #[inline]
    pub fn pop_num_with_max_size(&mut self, max_size: usize) -> Result<ScriptNum> {
        let value = self.pop()?;
        self.decode_num(&value, max_size)
    }

    /// Reads the number at `i` positions from the top without removing it.
    #[inline]
    pub fn peek_num(&self, i: usize, max_size: usize) -> Result<ScriptNum> {
        self.decode_num(self.top(i)?, max_size)
    }

    fn decode_num(&self, value: &[u8], max_size: usize) -> Result<ScriptNum> {
        ScriptNum::from_bytes(value, self.verify_minimaldata, Some(max_size)).map_err(Into::into)
    }

    /// Pushes the encoding of `num`.
    ///
    /// Before genesis results outside the signed 32-bit range are clamped when
    /// serialized.
    #[inline]
    pub fn push_num(&mut self, num: impl Into<ScriptNum>) -> &mut Self {
        let num = num.into();
        let bytes = if self.after_genesis {
            num.to_bytes()
        } else {
            num.clamp_i32().to_bytes()
        };
        self.push(bytes)
    }

    #[inline]
    pub fn push_bool(&mut self, boolean: bool) -> &mut Self {
        if boolean {
            self.push(vec![1])
        } else {
            self.push(Vec::new())
        }
    }

    /// Peeks the top element and converts it to a boolean.
    #[inline]
    pub fn peek_bool(&self) -> Result<bool> {
        Ok(cast_to_bool(self.last()?))
    }

    /// Pops the top element and converts it to a boolean.
    #[inline]
    pub fn pop_bool(&mut self) -> Result<bool> {
        Ok(cast_to_bool(&self.pop()?))
    }

    /// Removes the element at the given index from the top.
    #[inline]
    pub fn remove(&mut self, i: usize) -> Result<Vec<u8>> {
        let pos = i.checked_add(1).ok_or(StackError::InvalidOperation)?;
        self.require(pos)?;
        let to_remove = self.data.len() - pos;
        Ok(self.data.remove(to_remove))
    }

    /// Removes the top `n` stack items.
    #[inline]
    pub fn drop(&mut self, n: usize) -> Result<()> {
        self.require(n)?;
        for _ in 0..n {
            self.pop()?;
        }
        Ok(())
    }

    /// Duplicates the top N items on the stack.
    ///
    /// dup(1): [x1 x2] -> [x1 x2 x2]
    /// dup(2): [x1 x2] -> [x1 x2 x1 x2]
    #[inline]
    pub fn dup(&mut self, n: usize) -> Result<()> {
        self.require(n)?;
        let len = self.data.len();
        for i in len - n..len {
            let item = self.data[i].clone();
            self.push(item);
        }
        Ok(())
    }

    /// Copies N items N items back to the top of the stack.
    ///
    /// over(1): [... x1 x2 x3] -> [... x1 x2 x3 x2]
    /// over(2): [... x1 x2 x3 x4] -> [... x1 x2 x3 x4 x1 x2]
    #[inline]
    pub fn over(&mut self, n: usize) -> Result<()> {
        let count = n * 2;
        self.require(count)?;

        let start = self.data.len() - count;
        for i in start..start + n {
            let item = self.data[i].clone();
            self.push(item);
        }

        Ok(())
    }

    /// Rotates the top 3N items on the stack to the left N times.
    ///
    /// - rot(1): [x1 x2 x3] -> [x2 x3 x1]
    /// - rot(2): [x1 x2 x3 x4 x5 x6] -> [x3 x4 x5 x6 x1 x2]
    #[inline]
    pub fn rot(&mut self, n: usize) -> Result<()> {
        let count = n * 3;
        self.require(count)?;

        let len = self.data.len();
        self.data[len - count..].rotate_left(n);

        Ok(())
    }

    // Swaps the top N items on the stack with those below them.
    //
    // - swap(1): [x1 x2] -> [x2 x1]
    // - swap(2): [x1 x2 x3 x4] -> [x3 x4 x1 x2]
    #[inline]
    pub fn swap(&mut self, n: usize) -> Result<()> {
        let count = n * 2;
        self.require(count)?;
        let len = self.data.len();
        let (lower, upper) = self.data.split_at_mut(len - count + n);
        lower[len - count..].swap_with_slice(&mut upper[..n]);
        Ok(())
    }

    /// Removes the second-to-top stack item.
    ///
    /// nip: [x1 x2 x3] -> [x1 x3]
    #[inline]
    pub fn nip(&mut self) -> Result<()> {
        self.remove(1).map(|_| ())
    }

    // Copies the item at the top of the stack and inserts it before the 2nd
    // to top item.
    //
    // [... x1 x2] -> [... x2 x1 x2]
    #[inline]
    pub fn tuck(&mut self) -> Result<()> {
        self.require(2)?;
        let len = self.data.len();
        let v = self.data[len - 1].clone();
        self.data.insert(len - 2, v);
        Ok(())
    }

    /// Copies the item `n` positions from the top to the top.
    ///
    /// pick(1): [x1 x2 x3] -> [x1 x2 x3 x2]
    #[inline]
    pub fn pick(&mut self, n: i64) -> Result<()> {
        let n = usize::try_from(n).map_err(|_| StackError::InvalidOperation)?;
        let item = self.top(n)?.clone();
        self.push(item);
        Ok(())
    }

    /// Moves the item `n` positions from the top to the top.
    ///
    /// roll(1): [x1 x2 x3] -> [x1 x3 x2]
    #[inline]
    pub fn roll(&mut self, n: i64) -> Result<()> {
        let n = usize::try_from(n).map_err(|_| StackError::InvalidOperation)?;
        let item = self.remove(n)?;
        self.push(item);
        Ok(())
    }
}

/// Converts a byte slice to a boolean.
///
/// Negative zero (any number of zero bytes followed by `0x80`) is false.
pub fn cast_to_bool(data: &[u8]) -> bool {
    match data.split_last() {
        Some((&last, rest)) => rest.iter().any(|&x| x != 0) || (last != 0 && last != 0x80),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num::NumError;

    /// Builds a stack of one-byte items.
    fn stack(items: &[u8]) -> Stack {
        items.iter().map(|item| vec![*item]).collect::<Vec<_>>().into()
    }

    #[test]
    fn test_stack_require() {
        let stack1 = stack(&[]);
        assert_eq!(stack1.require(0), Ok(()));
        assert_eq!(stack1.require(1), Err(StackError::InvalidOperation));
        let stack1 = stack(&[0]);
        assert_eq!(stack1.require(0), Ok(()));
        assert_eq!(stack1.require(1), Ok(()));
        assert_eq!(stack1.require(2), Err(StackError::InvalidOperation));
        let stack1 = stack(&[0, 5]);
        assert_eq!(stack1.require(2), Ok(()));
        assert_eq!(stack1.require(3), Err(StackError::InvalidOperation));
    }

    #[test]
    fn test_stack_last() {
        assert_eq!(stack(&[]).last(), Err(StackError::InvalidOperation));
        assert_eq!(stack(&[0]).last(), Ok(&vec![0]));
        assert_eq!(stack(&[0, 5]).last(), Ok(&vec![5]));
    }

    #[test]
    fn test_stack_pop() {
        let mut s = stack(&[]);
        assert_eq!(s.pop(), Err(StackError::InvalidOperation));
        assert_eq!(s, stack(&[]));
        let mut s = stack(&[0, 5]);
        assert_eq!(s.pop(), Ok(vec![5]));
        assert_eq!(s.pop(), Ok(vec![0]));
        assert_eq!(s, stack(&[]));
    }

    #[test]
    fn test_stack_push() {
        let mut s = stack(&[]);
        s.push(vec![0]);
        assert_eq!(s, stack(&[0]));
        s.push(vec![5]);
        assert_eq!(s, stack(&[0, 5]));
    }

    #[test]
    fn test_stack_top() {
        assert_eq!(stack(&[]).top(0), Err(StackError::InvalidOperation));
        let s = stack(&[0, 5]);
        assert_eq!(s.top(0), Ok(&vec![5]));
        assert_eq!(s.top(1), Ok(&vec![0]));
        assert_eq!(s.top(2), Err(StackError::InvalidOperation));
        assert_eq!(s.top(usize::MAX), Err(StackError::InvalidOperation));
    }

    #[test]
    fn test_stack_remove() {
        let mut s = stack(&[]);
        assert_eq!(s.remove(0), Err(StackError::InvalidOperation));
        let mut s = stack(&[0, 5]);
        assert_eq!(s.remove(1), Ok(vec![0]));
        assert_eq!(s, stack(&[5]));
        assert_eq!(s.remove(0), Ok(vec![5]));
        assert_eq!(s, stack(&[]));
    }

    #[test]
    fn test_stack_drop() {
        let mut s = stack(&[]);
        assert_eq!(s.drop(0), Ok(()));
        let mut s = stack(&[0, 5]);
        assert_eq!(s.drop(3), Err(StackError::InvalidOperation));
        assert_eq!(s, stack(&[0, 5]));
        assert_eq!(s.drop(1), Ok(()));
        assert_eq!(s, stack(&[0]));
        let mut s = stack(&[3, 5, 0]);
        assert_eq!(s.drop(3), Ok(()));
        assert_eq!(s, stack(&[]));
    }

    #[test]
    fn test_stack_dup() {
        let mut s = stack(&[]);
        assert_eq!(s.dup(0), Ok(()));
        assert_eq!(s.dup(1), Err(StackError::InvalidOperation));
        let mut s = stack(&[0]);
        assert_eq!(s.dup(2), Err(StackError::InvalidOperation));
        assert_eq!(s, stack(&[0]));
        assert_eq!(s.dup(1), Ok(()));
        assert_eq!(s, stack(&[0, 0]));
        let mut s = stack(&[0, 1]);
        assert_eq!(s.dup(2), Ok(()));
        assert_eq!(s, stack(&[0, 1, 0, 1]));
        let mut s = stack(&[0, 1, 2]);
        assert_eq!(s.dup(3), Ok(()));
        assert_eq!(s, stack(&[0, 1, 2, 0, 1, 2]));
    }

    #[test]
    fn test_stack_over() {
        let mut s = stack(&[0]);
        assert_eq!(s.over(1), Err(StackError::InvalidOperation));
        let mut s = stack(&[0, 5]);
        assert_eq!(s.over(2), Err(StackError::InvalidOperation));
        assert_eq!(s.over(1), Ok(()));
        assert_eq!(s, stack(&[0, 5, 0]));
        let mut s = stack(&[1, 2, 3, 4]);
        assert_eq!(s.over(2), Ok(()));
        assert_eq!(s, stack(&[1, 2, 3, 4, 1, 2]));
    }

    #[test]
    fn test_stack_rot() {
        let mut s = stack(&[0, 5]);
        assert_eq!(s.rot(1), Err(StackError::InvalidOperation));
        assert_eq!(s, stack(&[0, 5]));
        let mut s = stack(&[0, 1, 2, 3]);
        assert_eq!(s.rot(1), Ok(()));
        assert_eq!(s, stack(&[0, 2, 3, 1]));
        let mut s = stack(&[0, 1, 2, 3, 4, 5]);
        assert_eq!(s.rot(3), Err(StackError::InvalidOperation));
        assert_eq!(s.rot(2), Ok(()));
        assert_eq!(s, stack(&[2, 3, 4, 5, 0, 1]));
    }

    #[test]
    fn test_stack_swap() {
        let mut s = stack(&[]);
        assert_eq!(s.swap(1), Err(StackError::InvalidOperation));
        let mut s = stack(&[0, 1, 2, 3]);
        assert_eq!(s.swap(1), Ok(()));
        assert_eq!(s, stack(&[0, 1, 3, 2]));
        assert_eq!(s.swap(2), Ok(()));
        assert_eq!(s, stack(&[3, 2, 0, 1]));
        assert_eq!(s.swap(3), Err(StackError::InvalidOperation));
        assert_eq!(s, stack(&[3, 2, 0, 1]));
    }

    #[test]
    fn test_stack_nip() {
        let mut s = stack(&[0]);
        assert_eq!(s.nip(), Err(StackError::InvalidOperation));
        let mut s = stack(&[0, 1, 2, 3]);
        assert_eq!(s.nip(), Ok(()));
        assert_eq!(s, stack(&[0, 1, 3]));
        assert_eq!(s.nip(), Ok(()));
        assert_eq!(s, stack(&[0, 3]));
    }

    #[test]
    fn test_stack_tuck() {
        let mut s = stack(&[0]);
        assert_eq!(s.tuck(), Err(StackError::InvalidOperation));
        let mut s = stack(&[0, 1]);
        assert_eq!(s.tuck(), Ok(()));
        assert_eq!(s, stack(&[1, 0, 1]));
        let mut s = stack(&[0, 1, 2, 3]);
        assert_eq!(s.tuck(), Ok(()));
        assert_eq!(s, stack(&[0, 1, 3, 2, 3]));
    }

    #[test]
    fn test_stack_pick_roll() {
        let mut s = stack(&[0, 1, 2]);
        assert_eq!(s.pick(-1), Err(StackError::InvalidOperation));
        assert_eq!(s.pick(3), Err(StackError::InvalidOperation));
        assert_eq!(s, stack(&[0, 1, 2]));
        assert_eq!(s.pick(2), Ok(()));
        assert_eq!(s, stack(&[0, 1, 2, 0]));
        assert_eq!(s.roll(-1), Err(StackError::InvalidOperation));
        assert_eq!(s.roll(4), Err(StackError::InvalidOperation));
        assert_eq!(s.roll(2), Ok(()));
        assert_eq!(s, stack(&[0, 2, 0, 1]));
        assert_eq!(s.roll(0), Ok(()));
        assert_eq!(s, stack(&[0, 2, 0, 1]));
    }

    #[test]
    fn test_net_depth_of_operation_sequence() {
        let mut s = stack(&[]);
        s.push(vec![1]).push(vec![2]).push(vec![3]);
        s.dup(2).unwrap();
        s.swap(1).unwrap();
        s.pick(4).unwrap();
        s.roll(2).unwrap();
        s.pop().unwrap();
        // 3 pushes + 2 (dup) + 1 (pick) - 1 (pop)
        assert_eq!(s.len(), 5);
    }

    #[test]
    fn test_stack_nums() {
        let mut s = Stack::new(4, true, false);
        s.push_num(-129);
        assert_eq!(s.last(), Ok(&vec![0x81, 0x80]));
        assert_eq!(s.peek_num(0, 4), Ok(ScriptNum::from(-129)));
        assert_eq!(s.pop_num(), Ok(ScriptNum::from(-129)));

        // Clamped before genesis.
        s.push_num(i64::MAX);
        assert_eq!(s.pop(), Ok(vec![0xff, 0xff, 0xff, 0x7f]));

        s.push(vec![0x01, 0x00]);
        assert_eq!(
            s.pop_num(),
            Err(StackError::Num(NumError::NotMinimallyEncoded))
        );
        s.push(vec![1, 2, 3, 4, 5]);
        assert_eq!(s.pop_num(), Err(StackError::Num(NumError::Overflow)));
        s.push(vec![1, 2, 3, 4, 5]);
        assert!(s.pop_num_with_max_size(5).is_ok());

        let mut s = Stack::new(8, false, true);
        s.push_num(i64::MAX);
        assert_eq!(s.pop(), Ok(vec![0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f]));
    }

    #[test]
    fn test_cast_to_bool() {
        assert!(!cast_to_bool(&[]));
        assert!(!cast_to_bool(&[0x00]));
        assert!(!cast_to_bool(&[0x00, 0x00]));
        assert!(!cast_to_bool(&[0x80]));
        assert!(!cast_to_bool(&[0x00, 0x00, 0x80]));
        assert!(cast_to_bool(&[0x01]));
        assert!(cast_to_bool(&[0x80, 0x00]));
        assert!(cast_to_bool(&[0x00, 0x81]));

        let mut s = stack(&[]);
        s.push_bool(true).push_bool(false);
        assert_eq!(s.peek_bool(), Ok(false));
        assert_eq!(s.pop_bool(), Ok(false));
        assert_eq!(s.pop_bool(), Ok(true));
        assert_eq!(s.pop_bool(), Err(StackError::InvalidOperation));
    }

    #[test]
    fn test_display() {
        let mut s = stack(&[0xab]);
        s.push(Vec::new());
        assert_eq!(s.to_string(), "[ab, <empty>]");
    }
}
