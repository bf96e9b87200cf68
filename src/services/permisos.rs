// src/services/permisos.rs
//
// Traducción de los módulos concedidos a un rol (tabla `rol_permisos`)
// a las claves de permiso que consume el cliente. Se calcula en el
// login y en el cambio de rol, y viaja dentro de la respuesta.

use std::collections::BTreeSet;

// Claves de módulo del backend → claves de permiso del frontend.
const MAPA_MODULOS: &[(&str, &str)] = &[
    ("beneficiarios", "venta-servicios-beneficiarios"),
    ("asistencia", "venta-servicios-asistencia"),
    ("pagos", "venta-servicios-pagos"),
    ("programacion_de_clases", "servicios-musicales-programacion-clases"),
    ("profesores", "servicios-musicales-profesores"),
    ("programacion_de_profesores", "servicios-musicales-programacion-profesores"),
    ("cursos_matriculas", "servicios-musicales-cursos-matriculas"),
    ("aulas", "servicios-musicales-aulas"),
    ("clases", "servicios-musicales-clases"),
    ("clientes", "venta-servicios-clientes"),
    ("venta_matriculas", "venta-servicios-venta-matriculas"),
    ("venta_cursos", "venta-servicios-venta-cursos"),
    ("roles", "configuracion-roles"),
    ("usuarios", "configuracion-usuarios"),
    ("dashboard", "dashboard"),
    ("dashboard-administrador", "dashboard"),
    ("dashboard-profesor", "dashboard"),
    ("dashboard-beneficiario", "dashboard"),
];

// Prefijos de claves ya normalizadas que se aceptan tal cual.
const PREFIJOS_NORMALIZADOS: &[&str] = &[
    "venta-servicios",
    "servicios-musicales",
    "configuracion",
    "dashboard",
];

// Mapea un módulo concedido a su clave de permiso. Las claves ya
// normalizadas pasan directo; lo desconocido se descarta.
pub fn mapear_modulo(modulo: &str) -> Option<&str> {
    if let Some((_, permiso)) = MAPA_MODULOS.iter().find(|(clave, _)| *clave == modulo) {
        return Some(permiso);
    }
    if PREFIJOS_NORMALIZADOS.iter().any(|p| modulo.starts_with(p)) {
        return Some(modulo);
    }
    None
}

// Permisos por defecto de cada rol, unidos a los concedidos. El
// administrador recibe el comodín `*`.
fn permisos_por_rol(rol: &str) -> &'static [&'static str] {
    match rol {
        "administrador" => &["*", "dashboard"],
        "profesor" => &[
            "servicios-musicales-profesores",
            "servicios-musicales-programacion-profesores",
            "servicios-musicales-programacion-clases",
            "servicios-musicales-clases",
            "venta-servicios-asistencia",
        ],
        "beneficiario" => &[
            "servicios-musicales-programacion-clases",
            "venta-servicios-pagos",
        ],
        "cliente" => &["venta-servicios-pagos", "venta-servicios-beneficiarios"],
        _ => &[],
    }
}

// Conjunto final de permisos de un rol: módulos concedidos mapeados,
// más los permisos por defecto del rol.
pub fn permisos_de_rol(rol: &str, modulos: &[String]) -> Vec<String> {
    let mut conjunto: BTreeSet<String> = modulos
        .iter()
        .filter_map(|m| mapear_modulo(m))
        .map(str::to_owned)
        .collect();

    let rol = rol.to_lowercase();
    for permiso in permisos_por_rol(&rol) {
        conjunto.insert((*permiso).to_owned());
    }

    conjunto.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // La evaluación del conjunto corre del lado del consumidor del
    // payload de login: el comodín `*` concede cualquier clave.
    fn tiene_permiso(permisos: &[String], clave: &str) -> bool {
        permisos.iter().any(|p| p == "*" || p == clave)
    }

    #[test]
    fn mapea_modulos_del_backend() {
        assert_eq!(mapear_modulo("pagos"), Some("venta-servicios-pagos"));
        assert_eq!(
            mapear_modulo("programacion_de_clases"),
            Some("servicios-musicales-programacion-clases")
        );
        assert_eq!(mapear_modulo("dashboard-profesor"), Some("dashboard"));
    }

    #[test]
    fn acepta_claves_ya_normalizadas() {
        assert_eq!(
            mapear_modulo("venta-servicios-pagos"),
            Some("venta-servicios-pagos")
        );
        assert_eq!(
            mapear_modulo("configuracion-roles"),
            Some("configuracion-roles")
        );
    }

    #[test]
    fn descarta_modulos_desconocidos() {
        assert_eq!(mapear_modulo("inventario"), None);
        assert_eq!(mapear_modulo(""), None);
    }

    #[test]
    fn administrador_recibe_comodin() {
        let permisos = permisos_de_rol("Administrador", &[]);
        assert!(permisos.contains(&"*".to_string()));
        assert!(permisos.contains(&"dashboard".to_string()));
        assert!(tiene_permiso(&permisos, "cualquier-cosa"));
    }

    #[test]
    fn cliente_ve_pagos_y_beneficiarios() {
        let permisos = permisos_de_rol("cliente", &[]);
        assert!(tiene_permiso(&permisos, "venta-servicios-pagos"));
        assert!(tiene_permiso(&permisos, "venta-servicios-beneficiarios"));
        assert!(!tiene_permiso(&permisos, "configuracion-usuarios"));
    }

    #[test]
    fn une_concedidos_con_los_del_rol_sin_duplicados() {
        let modulos = vec!["pagos".to_string(), "usuarios".to_string()];
        let permisos = permisos_de_rol("beneficiario", &modulos);

        assert!(permisos.contains(&"configuracion-usuarios".to_string()));
        assert!(permisos.contains(&"venta-servicios-pagos".to_string()));
        assert_eq!(
            permisos
                .iter()
                .filter(|p| *p == "venta-servicios-pagos")
                .count(),
            1
        );
    }
}
