use crate::coerce::{CoercionError, QueryArg, TargetType};
use crate::error::BoxError;
use crate::resource::Reply;
use serde_json::Value;
use thiserror::Error;

/// Represents a method of resource `R` taking `Args` as query arguments
///
/// Implemented for every `Fn(&R, A, B, ..) -> Ret` with up to 12 [`QueryArg`]
/// parameters and a [`Reply`] return type, so both `Self::method` paths and
/// closures can be declared as handlers.
pub trait ResourceMethod<R, Args>: Send + Sync + 'static {
    /// The target type of each parameter, in declaration order.
    fn target_types() -> Vec<TargetType>;

    fn call(&self, resource: &R, args: Vec<Value>) -> Result<String, InvokeError>;
}

/// Failure of a single handler call, before it is tied to a binding key.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("expected {expected} arguments, got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("argument {index}: {source}")]
    Argument {
        index: usize,
        #[source]
        source: CoercionError,
    },

    #[error("{0}")]
    Handler(BoxError),
}

macro_rules! count {
    () => { 0usize };
    ($head:ident $($tail:ident)*) => { 1usize + count!($($tail)*) };
}

/// impl `ResourceMethod` for `Fn`, from 0 parameters to 12 parameters
///
/// for example, it will impl Fn(&R, A, B) like this:
///```ignore
/// impl<Func, Ret, R, A, B> ResourceMethod<R, (A, B)> for Func
///    where
///        Func: Fn(&R, A, B) -> Ret + Send + Sync + 'static,
///        Ret: Reply,
///        A: QueryArg,
///        B: QueryArg,
/// {
///    fn target_types() -> Vec<TargetType> {
///        vec![A::target_type(), B::target_type()]
///    }
///
///    fn call(&self, resource: &R, args: Vec<Value>) -> Result<String, InvokeError> {
///        let [A, B] = <[Value; 2]>::try_from(args)?;
///        (self)(resource, A::from_value(A)?, B::from_value(B)?).into_reply()
///    }
/// }
///```
macro_rules! impl_resource_method_for_fn ({ $($param:ident)* } => {
    impl<Func, Ret, R, $($param,)*> ResourceMethod<R, ($($param,)*)> for Func
    where
        Func: Fn(&R, $($param),*) -> Ret + Send + Sync + 'static,
        Ret: Reply,
        $($param: QueryArg,)*
    {
        fn target_types() -> Vec<TargetType> {
            vec![$($param::target_type(),)*]
        }

        #[inline]
        #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments, reason = "expanded for every arity")]
        fn call(&self, resource: &R, args: Vec<Value>) -> Result<String, InvokeError> {
            let actual = args.len();
            let Ok([$($param,)*]) = <[Value; count!($($param)*)]>::try_from(args) else {
                return Err(InvokeError::Arity { expected: count!($($param)*), actual });
            };

            let mut index = 0usize;
            $(
                let $param = $param::from_value($param).map_err(|source| InvokeError::Argument { index, source })?;
                index += 1;
            )*

            (self)(resource, $($param,)*).into_reply().map_err(InvokeError::Handler)
        }
    }
});

impl_resource_method_for_fn! {}
impl_resource_method_for_fn! { A }
impl_resource_method_for_fn! { A B }
impl_resource_method_for_fn! { A B C }
impl_resource_method_for_fn! { A B C D }
impl_resource_method_for_fn! { A B C D E }
impl_resource_method_for_fn! { A B C D E F }
impl_resource_method_for_fn! { A B C D E F G }
impl_resource_method_for_fn! { A B C D E F G H }
impl_resource_method_for_fn! { A B C D E F G H I }
impl_resource_method_for_fn! { A B C D E F G H I J }
impl_resource_method_for_fn! { A B C D E F G H I J K }
impl_resource_method_for_fn! { A B C D E F G H I J K L }
