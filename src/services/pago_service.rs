// src/services/pago_service.rs
//
// Listado de pagos filtrado por rol y atribución del cliente de
// facturación a cada pago (pago → venta → beneficiario → cliente).

use std::collections::HashMap;

use tokio::task::JoinSet;
use uuid::Uuid;

use crate::{
    common::{error::AppError, response::ListaResponse},
    db::{
        BeneficiarioRepository, ClienteRepository, PagoRepository, RolRepository,
        UsuarioRepository, VentaRepository,
    },
    models::commerce::{
        ActualizarPagoPayload, BeneficiarioConCliente, CrearPagoPayload, FiltroPagos, Pago,
        PagoDetalle, VentaDetalle,
    },
    models::parties::{Beneficiario, InfoCliente, ReferenciaCliente},
};

// Plan de consulta del listado de pagos, elegido según el rol de la
// sesión y los filtros explícitos. Los roles de autoservicio ignoran
// los filtros sin excepción.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanPagos {
    // Rol beneficiario: solo los pagos de sus propias ventas.
    PropioBeneficiario,
    // Rol cliente: sus pagos y los de sus beneficiarios asociados.
    ClienteAsociados,
    // Rol administrativo con filtro ?clienteId.
    PorCliente(Uuid),
    // Rol administrativo con filtro ?documento.
    PorDocumento(String),
    // Sin filtros: todos los pagos.
    Todos,
}

pub fn plan_para(rol: &str, filtro: &FiltroPagos) -> PlanPagos {
    match rol.to_lowercase().as_str() {
        "beneficiario" => PlanPagos::PropioBeneficiario,
        "cliente" => PlanPagos::ClienteAsociados,
        _ => {
            if let Some(cliente_id) = filtro.cliente_id {
                PlanPagos::PorCliente(cliente_id)
            } else if let Some(documento) = filtro.documento.as_deref() {
                PlanPagos::PorDocumento(documento.to_owned())
            } else {
                PlanPagos::Todos
            }
        }
    }
}

// Resuelve el registro de cliente de facturación de un beneficiario.
// Una referencia irresoluble se registra en el log y queda en None;
// nunca tumba la petición.
pub(crate) async fn atribuir_cliente(
    cliente_repo: ClienteRepository,
    beneficiario_repo: BeneficiarioRepository,
    beneficiario: Beneficiario,
) -> Option<InfoCliente> {
    match beneficiario.cliente {
        ReferenciaCliente::Propio => Some(InfoCliente::desde_beneficiario(&beneficiario)),

        ReferenciaCliente::Cliente(id) => match cliente_repo.buscar_por_id(id).await {
            Ok(Some(cliente)) => Some(InfoCliente::desde_cliente(&cliente)),
            Ok(None) => {
                tracing::warn!(%id, "referencia a cliente inexistente");
                None
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "fallo al atribuir cliente");
                None
            }
        },

        ReferenciaCliente::Beneficiario(id) => match beneficiario_repo.buscar_por_id(id).await {
            Ok(Some(acudiente)) => Some(InfoCliente::desde_beneficiario(&acudiente)),
            Ok(None) => {
                tracing::warn!(%id, "referencia a beneficiario inexistente");
                None
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "fallo al atribuir beneficiario pagador");
                None
            }
        },
    }
}

#[derive(Clone)]
pub struct PagoService {
    pago_repo: PagoRepository,
    venta_repo: VentaRepository,
    beneficiario_repo: BeneficiarioRepository,
    cliente_repo: ClienteRepository,
    usuario_repo: UsuarioRepository,
    rol_repo: RolRepository,
}

impl PagoService {
    pub fn new(
        pago_repo: PagoRepository,
        venta_repo: VentaRepository,
        beneficiario_repo: BeneficiarioRepository,
        cliente_repo: ClienteRepository,
        usuario_repo: UsuarioRepository,
        rol_repo: RolRepository,
    ) -> Self {
        Self {
            pago_repo,
            venta_repo,
            beneficiario_repo,
            cliente_repo,
            usuario_repo,
            rol_repo,
        }
    }

    pub async fn listar(
        &self,
        usuario_id: Uuid,
        rol_id: Uuid,
        rol: &str,
        filtro: FiltroPagos,
    ) -> Result<ListaResponse<PagoDetalle>, AppError> {
        let pagos = match plan_para(rol, &filtro) {
            PlanPagos::PropioBeneficiario => {
                let Some(beneficiario) = self.beneficiario_del_usuario(usuario_id, rol_id).await?
                else {
                    return Ok(ListaResponse::new(Vec::new()));
                };
                self.pagos_de_beneficiarios(&[beneficiario.id]).await?
            }

            PlanPagos::ClienteAsociados => {
                let Some(beneficiario) = self.beneficiario_del_usuario(usuario_id, rol_id).await?
                else {
                    return Ok(ListaResponse::new(Vec::new()));
                };
                let ids = self.con_asociados(beneficiario.id).await?;
                self.pagos_de_beneficiarios(&ids).await?
            }

            PlanPagos::PorCliente(cliente_id) => {
                // Beneficiarios que referencian ese id, más el propio
                // registro si existe como beneficiario.
                let mut ids: Vec<Uuid> = self
                    .beneficiario_repo
                    .asociados_a(cliente_id)
                    .await?
                    .into_iter()
                    .map(|b| b.id)
                    .collect();
                if self
                    .beneficiario_repo
                    .buscar_por_id(cliente_id)
                    .await?
                    .is_some()
                {
                    ids.push(cliente_id);
                }
                self.pagos_de_beneficiarios(&ids).await?
            }

            PlanPagos::PorDocumento(documento) => {
                let Some(principal) = self.beneficiario_por_documento(&documento).await? else {
                    return Ok(ListaResponse::vacia_con_mensaje(
                        "No se encontraron pagos para el documento indicado",
                    ));
                };
                let ids = self.con_asociados(principal.id).await?;
                self.pagos_de_beneficiarios(&ids).await?
            }

            PlanPagos::Todos => self.pago_repo.listar().await?,
        };

        let detalles = self.armar_detalles(pagos).await?;
        Ok(ListaResponse::new(detalles))
    }

    pub async fn buscar_detalle(&self, id: Uuid) -> Result<PagoDetalle, AppError> {
        let pago = self
            .pago_repo
            .buscar_por_id(id)
            .await?
            .ok_or(AppError::NotFound("Pago"))?;
        self.detalle_de(pago).await
    }

    pub async fn crear(&self, datos: &CrearPagoPayload) -> Result<PagoDetalle, AppError> {
        self.venta_repo
            .buscar_por_id(datos.venta_id)
            .await?
            .ok_or(AppError::NotFound("Venta"))?;

        let pago = self.pago_repo.crear(datos).await?;
        self.detalle_de(pago).await
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        cambios: &ActualizarPagoPayload,
    ) -> Result<PagoDetalle, AppError> {
        if let Some(venta_id) = cambios.venta_id {
            self.venta_repo
                .buscar_por_id(venta_id)
                .await?
                .ok_or(AppError::NotFound("Venta"))?;
        }

        let pago = self
            .pago_repo
            .actualizar(id, cambios)
            .await?
            .ok_or(AppError::NotFound("Pago"))?;
        self.detalle_de(pago).await
    }

    pub async fn eliminar(&self, id: Uuid) -> Result<(), AppError> {
        if !self.pago_repo.eliminar(id).await? {
            return Err(AppError::NotFound("Pago"));
        }
        Ok(())
    }

    // Beneficiario del usuario autenticado: por la relación usuario-rol
    // activa y, en su defecto, por el documento del usuario.
    async fn beneficiario_del_usuario(
        &self,
        usuario_id: Uuid,
        rol_id: Uuid,
    ) -> Result<Option<Beneficiario>, AppError> {
        if let Some(relacion) = self.rol_repo.buscar_relacion_activa(usuario_id, rol_id).await? {
            if let Some(beneficiario) = self
                .beneficiario_repo
                .buscar_por_usuario_rol(relacion.id)
                .await?
            {
                return Ok(Some(beneficiario));
            }
        }

        if let Some(usuario) = self.usuario_repo.buscar_por_id(usuario_id).await? {
            return self
                .beneficiario_repo
                .buscar_por_documento(&usuario.documento)
                .await;
        }

        Ok(None)
    }

    // Resuelve el beneficiario principal de un documento, pasando por
    // la colección de clientes si hace falta.
    async fn beneficiario_por_documento(
        &self,
        documento: &str,
    ) -> Result<Option<Beneficiario>, AppError> {
        if let Some(beneficiario) = self
            .beneficiario_repo
            .buscar_por_documento(documento)
            .await?
        {
            return Ok(Some(beneficiario));
        }

        if let Some(cliente) = self.cliente_repo.buscar_por_documento(documento).await? {
            let asociados = self.beneficiario_repo.asociados_a(cliente.id).await?;
            return Ok(asociados.into_iter().next());
        }

        Ok(None)
    }

    // El beneficiario dado más todos los que lo referencian como pagador.
    async fn con_asociados(&self, beneficiario_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let mut ids = vec![beneficiario_id];
        for asociado in self.beneficiario_repo.asociados_a(beneficiario_id).await? {
            ids.push(asociado.id);
        }
        Ok(ids)
    }

    async fn pagos_de_beneficiarios(
        &self,
        beneficiario_ids: &[Uuid],
    ) -> Result<Vec<Pago>, AppError> {
        if beneficiario_ids.is_empty() {
            return Ok(Vec::new());
        }
        let venta_ids = self.venta_repo.ids_por_beneficiarios(beneficiario_ids).await?;
        if venta_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.pago_repo.listar_por_ventas(&venta_ids).await
    }

    async fn detalle_de(&self, pago: Pago) -> Result<PagoDetalle, AppError> {
        let mut detalles = self.armar_detalles(vec![pago]).await?;
        detalles
            .pop()
            .ok_or_else(|| anyhow::anyhow!("venta del pago inexistente").into())
    }

    // Resuelve venta y beneficiario por lote y atribuye el cliente de
    // cada pago de forma concurrente e independiente.
    async fn armar_detalles(&self, pagos: Vec<Pago>) -> Result<Vec<PagoDetalle>, AppError> {
        if pagos.is_empty() {
            return Ok(Vec::new());
        }

        let venta_ids: Vec<Uuid> = pagos.iter().map(|p| p.venta_id).collect();
        let ventas: HashMap<Uuid, _> = self
            .venta_repo
            .listar_por_ids(&venta_ids)
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        let beneficiario_ids: Vec<Uuid> = ventas.values().map(|v| v.beneficiario_id).collect();
        let beneficiarios: HashMap<Uuid, Beneficiario> = self
            .beneficiario_repo
            .listar_por_ids(&beneficiario_ids)
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        // Atribución concurrente, indexada para devolver los pagos en
        // el mismo orden en que llegaron.
        let mut tareas = JoinSet::new();
        let mut entradas = Vec::with_capacity(pagos.len());

        for (indice, pago) in pagos.into_iter().enumerate() {
            let Some(venta) = ventas.get(&pago.venta_id).cloned() else {
                tracing::warn!(pago_id = %pago.id, "pago sin venta asociada, se omite");
                continue;
            };
            let Some(beneficiario) = beneficiarios.get(&venta.beneficiario_id).cloned() else {
                tracing::warn!(venta_id = %venta.id, "venta sin beneficiario, se omite");
                continue;
            };

            let cliente_repo = self.cliente_repo.clone();
            let beneficiario_repo = self.beneficiario_repo.clone();
            let para_atribuir = beneficiario.clone();
            tareas.spawn(async move {
                (
                    indice,
                    atribuir_cliente(cliente_repo, beneficiario_repo, para_atribuir).await,
                )
            });

            entradas.push((indice, pago, venta, beneficiario));
        }

        let mut atribuciones: HashMap<usize, Option<InfoCliente>> = HashMap::new();
        while let Some(resultado) = tareas.join_next().await {
            let (indice, info) =
                resultado.map_err(|e| anyhow::anyhow!("falló la tarea de atribución: {e}"))?;
            atribuciones.insert(indice, info);
        }

        let detalles = entradas
            .into_iter()
            .map(|(indice, pago, venta, beneficiario)| PagoDetalle {
                pago,
                venta: VentaDetalle {
                    venta,
                    beneficiario: BeneficiarioConCliente::nuevo(
                        beneficiario,
                        atribuciones.remove(&indice).flatten(),
                    ),
                },
            })
            .collect();

        Ok(detalles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beneficiario_siempre_ve_solo_lo_propio() {
        let filtro = FiltroPagos {
            cliente_id: Some(Uuid::new_v4()),
            documento: Some("1012345678".into()),
        };
        assert_eq!(plan_para("beneficiario", &filtro), PlanPagos::PropioBeneficiario);
        assert_eq!(plan_para("Beneficiario", &filtro), PlanPagos::PropioBeneficiario);
    }

    #[test]
    fn cliente_ignora_filtros_explicitos() {
        let filtro = FiltroPagos {
            cliente_id: Some(Uuid::new_v4()),
            documento: None,
        };
        assert_eq!(plan_para("cliente", &filtro), PlanPagos::ClienteAsociados);
    }

    #[test]
    fn administrador_filtra_por_cliente_antes_que_por_documento() {
        let cliente_id = Uuid::new_v4();
        let filtro = FiltroPagos {
            cliente_id: Some(cliente_id),
            documento: Some("1012345678".into()),
        };
        assert_eq!(
            plan_para("administrador", &filtro),
            PlanPagos::PorCliente(cliente_id)
        );
    }

    #[test]
    fn administrador_filtra_por_documento() {
        let filtro = FiltroPagos {
            cliente_id: None,
            documento: Some("1012345678".into()),
        };
        assert_eq!(
            plan_para("administrador", &filtro),
            PlanPagos::PorDocumento("1012345678".into())
        );
    }

    #[test]
    fn sin_filtros_se_listan_todos() {
        let filtro = FiltroPagos::default();
        assert_eq!(plan_para("administrador", &filtro), PlanPagos::Todos);
        assert_eq!(plan_para("otro-rol", &filtro), PlanPagos::Todos);
    }
}
