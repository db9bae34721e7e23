//! A small java.lang / java.util class graph built through the public API.

#![allow(dead_code)]

use reify::{Class, ClassDecl, ClassRegistry, Type, TypeVariable, Types};

pub struct Library {
    pub registry: ClassRegistry,
    pub number: Class,
    pub integer: Class,
    pub string: Class,
    pub comparable: Class,
    pub iterable: Class,
    pub collection: Class,
    pub list: Class,
    pub list_e: TypeVariable,
    pub array_list: Class,
    pub map: Class,
    pub hash_map: Class,
    pub enum_: Class,
    pub enum_e: TypeVariable,
    pub time_unit: Class,
}

/// `raw<args...>`, validated against `registry`.
pub fn generic(registry: &ClassRegistry, raw: &Class, args: Vec<Type>) -> Type {
    Types::new(registry)
        .new_parameterized(raw, args)
        .unwrap_or_else(|err| panic!("{raw}: {err}"))
}

impl Library {
    pub fn new() -> Self {
        let registry = ClassRegistry::new();
        let serializable = Class::interface(reify::SERIALIZABLE);
        let cloneable = Class::interface(reify::CLONEABLE);

        let comparable = Class::interface("java.lang.Comparable");
        let comparable_t = registry.declare_type_parameter(&comparable, "T");
        registry.register(ClassDecl::new(comparable.clone()).with_type_parameters([comparable_t]));

        let number = registry
            .register(ClassDecl::new(Class::class("java.lang.Number")).implements(&serializable));
        let integer = Class::class("java.lang.Integer");
        registry.register(
            ClassDecl::new(integer.clone())
                .extends(&number)
                .implements(generic(&registry, &comparable, vec![integer.clone().into()])),
        );
        let string = Class::class("java.lang.String");
        registry.register(
            ClassDecl::new(string.clone())
                .implements(&serializable)
                .implements(generic(&registry, &comparable, vec![string.clone().into()])),
        );

        let iterable = Class::interface("java.lang.Iterable");
        let iterable_t = registry.declare_type_parameter(&iterable, "T");
        registry.register(ClassDecl::new(iterable.clone()).with_type_parameters([iterable_t]));

        let collection = Class::interface("java.util.Collection");
        let collection_e = registry.declare_type_parameter(&collection, "E");
        registry.register(
            ClassDecl::new(collection.clone())
                .with_type_parameters([collection_e.clone()])
                .implements(generic(&registry, &iterable, vec![collection_e.into()])),
        );

        let list = Class::interface("java.util.List");
        let list_e = registry.declare_type_parameter(&list, "E");
        registry.register(
            ClassDecl::new(list.clone())
                .with_type_parameters([list_e.clone()])
                .implements(generic(&registry, &collection, vec![(&list_e).into()])),
        );

        let array_list = Class::class("java.util.ArrayList");
        let array_list_e = registry.declare_type_parameter(&array_list, "E");
        registry.register(
            ClassDecl::new(array_list.clone())
                .with_type_parameters([array_list_e.clone()])
                .implements(generic(&registry, &list, vec![array_list_e.into()]))
                .implements(&cloneable)
                .implements(&serializable),
        );

        let map = Class::interface("java.util.Map");
        let map_k = registry.declare_type_parameter(&map, "K");
        let map_v = registry.declare_type_parameter(&map, "V");
        registry.register(ClassDecl::new(map.clone()).with_type_parameters([map_k, map_v]));

        let hash_map = Class::class("java.util.HashMap");
        let hash_map_k = registry.declare_type_parameter(&hash_map, "K");
        let hash_map_v = registry.declare_type_parameter(&hash_map, "V");
        registry.register(
            ClassDecl::new(hash_map.clone())
                .with_type_parameters([hash_map_k.clone(), hash_map_v.clone()])
                .implements(generic(&registry, &map, vec![hash_map_k.into(), hash_map_v.into()])),
        );

        // Enum<E extends Enum<E>>: register first, then install the F-bound.
        let enum_ = Class::class("java.lang.Enum");
        let enum_e = registry.declare_type_parameter(&enum_, "E");
        registry.register(ClassDecl::new(enum_.clone()).with_type_parameters([enum_e.clone()]));
        enum_e.set_bounds(vec![generic(&registry, &enum_, vec![(&enum_e).into()])]);
        registry.register(
            ClassDecl::new(enum_.clone())
                .with_type_parameters([enum_e.clone()])
                .implements(generic(&registry, &comparable, vec![(&enum_e).into()]))
                .implements(&serializable),
        );
        let time_unit = Class::class("java.util.concurrent.TimeUnit");
        registry.register(
            ClassDecl::new(time_unit.clone())
                .extends(generic(&registry, &enum_, vec![time_unit.clone().into()])),
        );

        Self {
            registry,
            number,
            integer,
            string,
            comparable,
            iterable,
            collection,
            list,
            list_e,
            array_list,
            map,
            hash_map,
            enum_,
            enum_e,
            time_unit,
        }
    }

    pub fn types(&self) -> Types<'_> {
        Types::new(&self.registry)
    }

    pub fn of(&self, raw: &Class, args: Vec<Type>) -> Type {
        generic(&self.registry, raw, args)
    }

    pub fn list_of(&self, arg: impl Into<Type>) -> Type {
        self.of(&self.list, vec![arg.into()])
    }

    pub fn array_list_of(&self, arg: impl Into<Type>) -> Type {
        self.of(&self.array_list, vec![arg.into()])
    }
}
