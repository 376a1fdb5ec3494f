use super::{Action, LexemeBuilder, ThunkStateMixin};
use crate::{ILexeme, Lex};

impl<T: ILexeme> LexemeBuilder for T {
    fn thunk_mixin<
        TM: Fn(&Lex<Self::Token>, &[u8], &Vec<Lex<Self::Token>>) -> Action<Self::State>,
    >(
        self,
        thunk: TM,
    ) -> ThunkStateMixin<Self, TM>
    where
        Self: Sized,
    {
        ThunkStateMixin::new(self, thunk)
    }
}
